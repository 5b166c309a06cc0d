//! Session-gated ledger client.
//!
//! [`SessionManager`] follows the Auth Provider, [`LedgerStore`] caches the
//! user's ledger from the Remote Store, and [`SyncCoordinator`] ties the two
//! together: every session transition and every mutation ends in a full
//! resynchronization, and the monthly view is derived on read.

pub use auth::{AuthProvider, Session, SessionCell, SignUpOutcome};
pub use error::{AuthError, InvalidBaseUrl, MutationError, StoreError, SyncError};
pub use http::{HttpAuthProvider, HttpRemoteStore};
pub use remote::RemoteStore;
pub use session::{SessionManager, SessionSubscription};
pub use store::{FetchOutcome, FetchTicket, LedgerStore, SyncStatus};
pub use sync::{AppState, LedgerView, SyncCoordinator};

mod auth;
mod error;
mod http;
mod remote;
mod session;
mod store;
mod sync;
