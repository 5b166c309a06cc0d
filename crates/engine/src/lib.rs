//! Ledger domain: transactions, amounts, periods and the monthly aggregation.
//!
//! The engine has no I/O. The client crate feeds it the cached ledger and
//! renders whatever [`aggregate`] derives from it.

pub use aggregate::{Aggregate, ChartSeries, ChartSlice, aggregate, filter, total};
pub use amount::{Amount, group_thousands};
pub use api_types::transaction::TransactionId;
pub use error::InputError;
pub use period::Period;
pub use transactions::{Transaction, TransactionDraft, TransactionInput, TransactionKind};

mod aggregate;
mod amount;
mod error;
mod period;
mod transactions;
