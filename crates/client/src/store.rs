//! Local cache of the session's ledger.
//!
//! The cache is only ever replaced as a whole by a fetch response; create and
//! delete go to the remote store and are followed by a fresh fetch.
//!
//! Fetches are sequenced: [`LedgerStore::begin_fetch`] hands out tickets with
//! increasing sequence numbers and [`LedgerStore::complete_fetch`] drops any
//! response that is not newer than the last applied one, or that was issued
//! before the last [`LedgerStore::clear`].

use api_types::transaction::{TransactionId, TransactionRecord};
use engine::{Transaction, TransactionDraft};

use crate::{MutationError, RemoteStore, Session, StoreError, SyncError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing requested yet (or cleared by sign-out).
    #[default]
    Idle,
    /// A fetch is pending; the cache holds the previous contents.
    Loading,
    /// The cache reflects the latest fetch.
    Ready,
    /// The latest fetch failed; the cache holds the previous contents.
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(self) -> u64 {
        self.seq
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { count: usize },
    /// A newer response was already applied, or the cache was cleared after
    /// the request was issued.
    Superseded,
}

#[derive(Debug)]
pub struct LedgerStore<R> {
    remote: R,
    cache: Vec<Transaction>,
    status: SyncStatus,
    issued: u64,
    applied: u64,
}

impl<R: RemoteStore> LedgerStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            cache: Vec::new(),
            status: SyncStatus::Idle,
            issued: 0,
            applied: 0,
        }
    }

    /// Cached ledger, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.cache
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.status = SyncStatus::Loading;
        FetchTicket { seq: self.issued }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<TransactionRecord>, StoreError>,
    ) -> Result<FetchOutcome, SyncError> {
        if ticket.seq <= self.applied {
            tracing::warn!(
                seq = ticket.seq,
                applied = self.applied,
                "discarding superseded fetch response"
            );
            return Ok(FetchOutcome::Superseded);
        }
        let latest = ticket.seq == self.issued;

        match result {
            Ok(records) => {
                self.applied = ticket.seq;
                self.cache = into_ledger(records);
                if latest {
                    self.status = SyncStatus::Ready;
                }
                tracing::info!(seq = ticket.seq, count = self.cache.len(), "ledger synchronized");
                Ok(FetchOutcome::Applied {
                    count: self.cache.len(),
                })
            }
            Err(err) => {
                tracing::warn!(seq = ticket.seq, "ledger fetch failed: {err}");
                if latest {
                    self.status = SyncStatus::Failed(err.to_string());
                }
                Err(SyncError::Fetch(err))
            }
        }
    }

    /// Replaces the cache with everything the session can see.
    pub async fn fetch_all(&mut self, session: &Session) -> Result<FetchOutcome, SyncError> {
        let ticket = self.begin_fetch();
        let result = self.remote.fetch_all(session).await;
        self.complete_fetch(ticket, result)
    }

    /// Submits a create request owned by the session's user. The cache is not
    /// touched.
    pub async fn insert(
        &self,
        session: &Session,
        draft: TransactionDraft,
    ) -> Result<(), MutationError> {
        let payload = draft.into_insert(session.user_id);
        tracing::debug!(description = %payload.description, amount = payload.amount, "inserting transaction");
        self.remote
            .insert(session, &payload)
            .await
            .map_err(MutationError::Rejected)
    }

    /// Submits a delete request. Ownership is enforced by the store.
    pub async fn remove(&self, session: &Session, id: &TransactionId) -> Result<(), MutationError> {
        tracing::debug!(%id, "removing transaction");
        self.remote
            .delete(session, id)
            .await
            .map_err(MutationError::Rejected)
    }

    /// Drops the cache and fences every fetch still in flight.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.applied = self.issued;
        self.status = SyncStatus::Idle;
    }
}

fn into_ledger(records: Vec<TransactionRecord>) -> Vec<Transaction> {
    let mut ledger: Vec<Transaction> = records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            Transaction::try_from(record)
                .inspect_err(|err| tracing::warn!(%id, "skipping malformed record: {err}"))
                .ok()
        })
        .collect();
    ledger.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    ledger
}
