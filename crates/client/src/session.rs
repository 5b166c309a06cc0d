use api_types::auth::Credentials;
use tokio::sync::watch;

use crate::{AuthError, AuthProvider, Session, SignUpOutcome};

/// Client-side view of the provider's session lifecycle.
#[derive(Debug)]
pub struct SessionManager<A> {
    provider: A,
}

impl<A: AuthProvider> SessionManager<A> {
    pub fn new(provider: A) -> Self {
        Self { provider }
    }

    /// Asks the provider for the session it currently holds.
    pub async fn current_session(&self) -> Option<Session> {
        self.provider.get_session().await
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.provider.on_auth_state_change(),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let credentials = credentials(email, password)?;
        let outcome = self.provider.sign_up(&credentials).await?;
        tracing::info!(email = %credentials.email, ?outcome, "signed up");
        Ok(outcome)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let credentials = credentials(email, password)?;
        self.provider.sign_in_with_password(&credentials).await?;
        tracing::info!(email = %credentials.email, "signed in");
        Ok(())
    }

    /// Ends the session. A provider failure is logged, never returned: the
    /// session is gone from the client's point of view either way.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::warn!("sign out failed on provider side: {err}");
        }
    }
}

fn credentials(email: &str, password: &str) -> Result<Credentials, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Scoped registration for session transitions.
///
/// Each delivered value is the complete new session and supersedes the
/// previous one; transitions that happen between two reads collapse into the
/// latest. Dropping the subscription releases it.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// Latest unseen transition, without waiting.
    pub fn try_next(&mut self) -> Option<Option<Session>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Waits for the next transition. `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        tracing::debug!("session subscription released");
    }
}
