use std::future::Future;

use api_types::transaction::{TransactionId, TransactionInsert, TransactionRecord};

use crate::{Session, StoreError};

/// The authoritative `transactions` table.
///
/// Row visibility and mutability are restricted to the session's user by the
/// store's access policy; implementations never filter locally.
pub trait RemoteStore {
    /// `select * order by occurredAt desc`
    fn fetch_all(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, StoreError>>;

    fn insert(
        &self,
        session: &Session,
        payload: &TransactionInsert,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// `delete where id = :id`
    fn delete(
        &self,
        session: &Session,
        id: &TransactionId,
    ) -> impl Future<Output = Result<(), StoreError>>;
}
