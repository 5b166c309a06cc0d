use chrono::{DateTime, TimeZone, Utc};
use engine::{Aggregate, Period, TransactionDraft, TransactionId, TransactionInput, aggregate};

use crate::{
    AuthError, AuthProvider, FetchOutcome, LedgerStore, MutationError, RemoteStore, Session,
    SessionManager, SessionSubscription, SignUpOutcome, SyncError, SyncStatus,
};

/// The single application state value. Only the coordinator's transition
/// methods change it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppState {
    pub session: Option<Session>,
    pub period: Period,
}

/// Everything a front end needs to draw the ledger screen, derived on read.
#[derive(Clone, Debug)]
pub struct LedgerView {
    pub email: Option<String>,
    pub period: Period,
    pub status: SyncStatus,
    /// Size of the whole cached ledger, across every period.
    pub cached: usize,
    pub aggregate: Aggregate,
}

impl LedgerView {
    /// The latest fetch failed and the cache still holds an older ledger.
    pub fn is_stale(&self) -> bool {
        matches!(self.status, SyncStatus::Failed(_)) && self.cached > 0
    }
}

/// Drives the ledger cache from session transitions and mutation outcomes.
pub struct SyncCoordinator<A, R, Tz> {
    sessions: SessionManager<A>,
    subscription: SessionSubscription,
    store: LedgerStore<R>,
    state: AppState,
    tz: Tz,
}

impl<A, R, Tz> SyncCoordinator<A, R, Tz>
where
    A: AuthProvider,
    R: RemoteStore,
    Tz: TimeZone,
{
    /// Subscribes to session transitions, then applies the session the
    /// provider already holds. The selected period starts at the month of
    /// `now` in the observer's calendar.
    pub async fn start(auth: A, remote: R, tz: Tz, now: DateTime<Utc>) -> Self {
        let sessions = SessionManager::new(auth);
        let subscription = sessions.subscribe();
        let period = Period::current(&tz, now);

        let mut coordinator = Self {
            sessions,
            subscription,
            store: LedgerStore::new(remote),
            state: AppState {
                session: None,
                period,
            },
            tz,
        };

        let initial = coordinator.sessions.current_session().await;
        coordinator.apply_session(initial).await;
        coordinator
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    pub fn store(&self) -> &LedgerStore<R> {
        &self.store
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.sessions.sign_up(email, password).await?;
        self.process_pending().await;
        Ok(outcome)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.sessions.sign_in(email, password).await?;
        self.process_pending().await;
        Ok(())
    }

    pub async fn sign_out(&mut self) {
        self.sessions.sign_out().await;
        self.process_pending().await;
        self.apply_session(None).await;
    }

    /// Applies transitions already announced by the provider. Returns how
    /// many were applied.
    pub async fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(session) = self.subscription.try_next() {
            self.apply_session(session).await;
            applied += 1;
        }
        applied
    }

    /// Waits for the next transition and applies it. Returns `false` once the
    /// provider has gone away.
    pub async fn next_transition(&mut self) -> bool {
        match self.subscription.next().await {
            Some(session) => {
                self.apply_session(session).await;
                true
            }
            None => false,
        }
    }

    async fn apply_session(&mut self, session: Option<Session>) {
        let Some(session) = session else {
            if let Some(previous) = self.state.session.take() {
                tracing::info!(user = %previous.user_id, "session ended");
            }
            self.store.clear();
            return;
        };

        let same_user = self
            .state
            .session
            .as_ref()
            .is_some_and(|current| current.user_id == session.user_id);
        if !same_user {
            tracing::info!(user = %session.user_id, "session started");
            self.store.clear();
        }
        self.state.session = Some(session.clone());

        if let Err(err) = self.store.fetch_all(&session).await {
            tracing::warn!("fetch after session change failed: {err}");
        }
    }

    /// Re-fetches the ledger; the manual retry after a failed sync.
    pub async fn refresh(&mut self) -> Result<FetchOutcome, SyncError> {
        let session = self.state.session.clone().ok_or(SyncError::NotSignedIn)?;
        self.store.fetch_all(&session).await
    }

    /// Validates the form input and submits it. Invalid input is rejected
    /// before any request. Once submitted, the ledger is re-fetched whether
    /// the create succeeded or not, then the create's error is returned so
    /// the caller can keep the input for editing.
    pub async fn insert(&mut self, input: &TransactionInput) -> Result<(), MutationError> {
        let draft = TransactionDraft::parse(input, &self.tz)?;
        let session = self.state.session.clone().ok_or(MutationError::NotSignedIn)?;

        let result = self.store.insert(&session, draft).await;
        if let Err(err) = &result {
            tracing::warn!("insert failed: {err}");
        }
        self.resync(&session).await;
        result
    }

    /// Submits the delete, then always re-fetches the ledger.
    pub async fn remove(&mut self, id: &TransactionId) -> Result<(), MutationError> {
        let session = self.state.session.clone().ok_or(MutationError::NotSignedIn)?;

        let result = self.store.remove(&session, id).await;
        if let Err(err) = &result {
            tracing::warn!(%id, "remove failed: {err}");
        }
        self.resync(&session).await;
        result
    }

    async fn resync(&mut self, session: &Session) {
        if let Err(err) = self.store.fetch_all(session).await {
            tracing::warn!("resync after mutation failed: {err}");
        }
    }

    pub fn select_period(&mut self, period: Period) {
        self.state.period = period;
    }

    pub fn previous_period(&mut self) {
        self.state.period = self.state.period.previous();
    }

    pub fn next_period(&mut self) {
        self.state.period = self.state.period.next();
    }

    /// Recomputes the derived view from the current cache.
    pub fn view(&self) -> LedgerView {
        LedgerView {
            email: self.state.session.as_ref().map(|s| s.email.clone()),
            period: self.state.period,
            status: self.store.status().clone(),
            cached: self.store.transactions().len(),
            aggregate: aggregate(self.store.transactions(), self.state.period, &self.tz),
        }
    }

    /// Releases the session subscription.
    pub fn shutdown(self) {
        self.subscription.unsubscribe();
        tracing::debug!("sync coordinator stopped");
    }
}
