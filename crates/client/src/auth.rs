//! Auth Provider seam.
//!
//! The provider owns the session: it verifies credentials, issues tokens and
//! announces every transition on a watch channel. The client only ever reads
//! copies of the session.

use std::{fmt, future::Future};

use api_types::auth::Credentials;
use tokio::sync::watch;
use uuid::Uuid;

use crate::AuthError;

/// Authenticated identity as handed out by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    /// Opaque bearer token.
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists but no session until the email is confirmed.
    ConfirmationPending,
    /// The provider confirmed the account and opened a session.
    SignedIn,
}

pub trait AuthProvider {
    fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<SignUpOutcome, AuthError>>;

    /// On success the new session must already be published when the future
    /// resolves.
    fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), AuthError>>;

    /// Must publish an absent session even when the remote call fails.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;

    fn get_session(&self) -> impl Future<Output = Option<Session>>;

    /// Receiver of every future transition. Dropping it unsubscribes.
    fn on_auth_state_change(&self) -> watch::Receiver<Option<Session>>;
}

/// Holder of the provider-side session and its change channel.
#[derive(Debug)]
pub struct SessionCell {
    tx: watch::Sender<Option<Session>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionCell {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Replaces the session wholesale and notifies every subscriber.
    pub fn replace(&self, session: Option<Session>) -> Option<Session> {
        self.tx.send_replace(session)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}
