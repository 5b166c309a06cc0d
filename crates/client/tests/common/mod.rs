//! In-memory Auth Provider and Remote Store used by the integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::{
    auth::Credentials,
    transaction::{TransactionId, TransactionInsert, TransactionKind, TransactionRecord},
};
use chrono::{DateTime, TimeZone, Utc};
use cuan_client::{AuthError, AuthProvider, RemoteStore, Session, SessionCell, SignUpOutcome, StoreError};
use tokio::sync::watch;
use uuid::Uuid;

pub const PASSWORD: &str = "rahasia123";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
}

struct Account {
    id: Uuid,
    password: String,
    confirmed: bool,
}

#[derive(Default)]
struct AuthInner {
    accounts: Mutex<HashMap<String, Account>>,
    session: SessionCell,
    sign_in_calls: Mutex<usize>,
}

/// Auth Provider that keeps accounts in a map. Cloning shares state, so a
/// test can keep a handle after giving one to the coordinator.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    inner: Arc<AuthInner>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a confirmed account and returns its user id.
    pub fn add_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                password: PASSWORD.to_string(),
                confirmed: true,
            },
        );
        id
    }

    pub fn confirm(&self, email: &str) {
        if let Some(account) = self.inner.accounts.lock().unwrap().get_mut(email) {
            account.confirmed = true;
        }
    }

    /// Opens a session without going through sign-in, as a restored session
    /// would look at startup.
    pub fn restore(&self, email: &str) -> Session {
        let id = self.inner.accounts.lock().unwrap()[email].id;
        let session = session_for(id, email);
        self.inner.session.replace(Some(session.clone()));
        session
    }

    /// Provider-driven transition, e.g. token expiry.
    pub fn expire(&self) {
        self.inner.session.replace(None);
    }

    pub fn sign_in_calls(&self) -> usize {
        *self.inner.sign_in_calls.lock().unwrap()
    }
}

fn session_for(id: Uuid, email: &str) -> Session {
    Session {
        user_id: id,
        email: email.to_string(),
        token: format!("token-{id}"),
    }
}

impl AuthProvider for MemoryAuth {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        if credentials.password.len() < 6 {
            return Err(AuthError::Rejected("password too weak".to_string()));
        }
        let mut accounts = self.inner.accounts.lock().unwrap();
        if accounts.contains_key(&credentials.email) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }
        accounts.insert(
            credentials.email.clone(),
            Account {
                id: Uuid::new_v4(),
                password: credentials.password.clone(),
                confirmed: false,
            },
        );
        Ok(SignUpOutcome::ConfirmationPending)
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<(), AuthError> {
        *self.inner.sign_in_calls.lock().unwrap() += 1;
        let session = {
            let accounts = self.inner.accounts.lock().unwrap();
            match accounts.get(&credentials.email) {
                Some(account) if account.password == credentials.password && account.confirmed => {
                    session_for(account.id, &credentials.email)
                }
                Some(account) if account.password == credentials.password => {
                    return Err(AuthError::InvalidCredentials("Email not confirmed".to_string()));
                }
                _ => {
                    return Err(AuthError::InvalidCredentials(
                        "Invalid login credentials".to_string(),
                    ));
                }
            }
        };
        self.inner.session.replace(Some(session));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.session.replace(None);
        Ok(())
    }

    async fn get_session(&self) -> Option<Session> {
        self.inner.session.current()
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }
}

#[derive(Default)]
struct RemoteState {
    rows: Vec<TransactionRecord>,
    next_id: u64,
    failing_fetches: usize,
    fail_inserts: bool,
    fail_deletes: bool,
    fetch_calls: usize,
    insert_calls: usize,
    delete_calls: usize,
}

/// Remote Store with a per-owner access policy.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(
        &self,
        owner: Uuid,
        description: &str,
        amount: i64,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
    ) -> TransactionId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = TransactionId::new(state.next_id.to_string());
        state.rows.push(TransactionRecord {
            id: id.clone(),
            description: description.to_string(),
            amount,
            kind,
            occurred_at: occurred_at.fixed_offset(),
            owner_id: owner,
        });
        id
    }

    pub fn fail_next_fetches(&self, count: usize) {
        self.state.lock().unwrap().failing_fetches = count;
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.state.lock().unwrap().fail_inserts = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn rows(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }
}

impl RemoteStore for MemoryRemote {
    async fn fetch_all(&self, session: &Session) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        if state.failing_fetches > 0 {
            state.failing_fetches -= 1;
            return Err(StoreError::Server("connection reset".to_string()));
        }
        // Insertion order on purpose: ordering is the client's job.
        Ok(state
            .rows
            .iter()
            .filter(|row| row.owner_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, session: &Session, payload: &TransactionInsert) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        if state.fail_inserts {
            return Err(StoreError::Server("insert failed".to_string()));
        }
        if payload.owner_id != session.user_id {
            return Err(StoreError::Forbidden);
        }
        state.next_id += 1;
        let id = TransactionId::new(state.next_id.to_string());
        state.rows.push(TransactionRecord {
            id,
            description: payload.description.clone(),
            amount: payload.amount,
            kind: payload.kind,
            occurred_at: payload.occurred_at,
            owner_id: payload.owner_id,
        });
        Ok(())
    }

    async fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if state.fail_deletes {
            return Err(StoreError::Forbidden);
        }
        // Rows of other users are invisible to the delete, not an error.
        state
            .rows
            .retain(|row| !(row.id == *id && row.owner_id == session.user_id));
        Ok(())
    }
}
