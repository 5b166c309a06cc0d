//! Monthly aggregation over the ledger.
//!
//! Everything here is a pure function of its arguments: callers recompute the
//! view on every read instead of caching it.

use chrono::TimeZone;

use crate::{Amount, Period, Transaction, TransactionKind};

/// One slice of the income/expense chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartSlice {
    pub kind: TransactionKind,
    pub value: Amount,
}

/// The two-slice chart series. Both slices are always present, zero or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartSeries {
    pub incoming: ChartSlice,
    pub outgoing: ChartSlice,
}

impl ChartSeries {
    pub fn new(incoming: Amount, outgoing: Amount) -> Self {
        Self {
            incoming: ChartSlice {
                kind: TransactionKind::Incoming,
                value: incoming,
            },
            outgoing: ChartSlice {
                kind: TransactionKind::Outgoing,
                value: outgoing,
            },
        }
    }

    pub fn slices(&self) -> [ChartSlice; 2] {
        [self.incoming, self.outgoing]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregate {
    pub filtered: Vec<Transaction>,
    pub total_incoming: Amount,
    pub total_outgoing: Amount,
    /// `total_incoming - total_outgoing`, may be negative.
    pub balance: i64,
    pub chart_series: ChartSeries,
}

/// Transactions that occurred in `period`, in the observer's calendar `tz`.
///
/// Input order is preserved.
pub fn filter<'a, Tz, I>(transactions: I, period: Period, tz: &Tz) -> Vec<Transaction>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| period.contains(&tx.occurred_at, tz))
        .cloned()
        .collect()
}

/// Sum of `amount` over the transactions of the given kind.
pub fn total<'a, I>(transactions: I, kind: TransactionKind) -> Amount
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.kind == kind)
        .map(|tx| tx.amount)
        .sum()
}

pub fn aggregate<Tz: TimeZone>(transactions: &[Transaction], period: Period, tz: &Tz) -> Aggregate {
    let filtered = filter(transactions, period, tz);
    let total_incoming = total(&filtered, TransactionKind::Incoming);
    let total_outgoing = total(&filtered, TransactionKind::Outgoing);

    Aggregate {
        balance: total_incoming.signed_diff(total_outgoing),
        chart_series: ChartSeries::new(total_incoming, total_outgoing),
        filtered,
        total_incoming,
        total_outgoing,
    }
}
