//! HTTP implementations of the Auth Provider and the Remote Store, talking to
//! a hosted auth service (`auth/v1/*`) and a REST table endpoint
//! (`rest/v1/transactions`).

use api_types::{
    ErrorResponse,
    auth::{Credentials, SignUpResponse, TokenResponse},
    transaction::{TransactionId, TransactionInsert, TransactionRecord},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use tokio::sync::watch;

use crate::{
    AuthError, AuthProvider, InvalidBaseUrl, RemoteStore, Session, SessionCell, SignUpOutcome,
    StoreError,
};

const TRANSACTIONS_PATH: &str = "rest/v1/transactions";

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl Endpoint {
    fn new(base_url: &str, api_key: &str) -> Result<Self, InvalidBaseUrl> {
        let mut url = Url::parse(base_url).map_err(|err| InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a base url".to_string(),
            });
        }
        // `join` replaces the last segment unless the path ends with a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, String> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| format!("invalid endpoint {path}: {err}"))?;
        Ok(self
            .http
            .request(method, endpoint)
            .header("apikey", &self.api_key))
    }
}

async fn error_message(res: Response) -> String {
    res.json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Auth Provider backed by the hosted auth service. The session lives in
/// memory only.
#[derive(Debug)]
pub struct HttpAuthProvider {
    endpoint: Endpoint,
    session: SessionCell,
}

impl HttpAuthProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, InvalidBaseUrl> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, api_key)?,
            session: SessionCell::default(),
        })
    }

    fn publish(&self, token: String, user: api_types::auth::AuthUser) {
        self.session.replace(Some(Session {
            user_id: user.id,
            email: user.email,
            token,
        }));
    }
}

impl AuthProvider for HttpAuthProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        let res = self
            .endpoint
            .request(Method::POST, "auth/v1/signup")
            .map_err(AuthError::Provider)?
            .json(credentials)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            let body = res.json::<SignUpResponse>().await?;
            return Ok(match (body.access_token, body.user) {
                (Some(token), Some(user)) => {
                    self.publish(token, user);
                    SignUpOutcome::SignedIn
                }
                _ => SignUpOutcome::ConfirmationPending,
            });
        }

        let message = error_message(res).await;
        Err(match status.as_u16() {
            400 | 409 | 422 | 429 => AuthError::Rejected(message),
            _ => AuthError::Provider(message),
        })
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let res = self
            .endpoint
            .request(Method::POST, "auth/v1/token")
            .map_err(AuthError::Provider)?
            .query(&[("grant_type", "password")])
            .json(credentials)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            let body = res.json::<TokenResponse>().await?;
            self.publish(body.access_token, body.user);
            return Ok(());
        }

        let message = error_message(res).await;
        Err(match status.as_u16() {
            400 | 401 => AuthError::InvalidCredentials(message),
            422 | 429 => AuthError::Rejected(message),
            _ => AuthError::Provider(message),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.replace(None) else {
            return Ok(());
        };

        let res = self
            .endpoint
            .request(Method::POST, "auth/v1/logout")
            .map_err(AuthError::Provider)?
            .bearer_auth(&session.token)
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(AuthError::Provider(error_message(res).await))
    }

    async fn get_session(&self) -> Option<Session> {
        self.session.current()
    }

    fn on_auth_state_change(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

/// Remote Store backed by the REST table endpoint. Requests carry the
/// session's bearer token so the access policy can scope rows.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    endpoint: Endpoint,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, InvalidBaseUrl> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, api_key)?,
        })
    }

    fn request(&self, method: Method, session: &Session) -> Result<RequestBuilder, StoreError> {
        Ok(self
            .endpoint
            .request(method, TRANSACTIONS_PATH)
            .map_err(StoreError::Server)?
            .bearer_auth(&session.token))
    }
}

async fn store_error(res: Response) -> StoreError {
    let status = res.status().as_u16();
    StoreError::from_status(status, error_message(res).await)
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self, session: &Session) -> Result<Vec<TransactionRecord>, StoreError> {
        tracing::debug!(user = %session.user_id, "fetching transactions");
        let res = self
            .request(Method::GET, session)?
            .query(&[("select", "*"), ("order", "occurredAt.desc")])
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Vec<TransactionRecord>>().await?);
        }
        Err(store_error(res).await)
    }

    async fn insert(&self, session: &Session, payload: &TransactionInsert) -> Result<(), StoreError> {
        let res = self
            .request(Method::POST, session)?
            .header("Prefer", "return=minimal")
            .json(&[payload])
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(store_error(res).await)
    }

    async fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), StoreError> {
        let filter = format!("eq.{id}");
        let res = self
            .request(Method::DELETE, session)?
            .query(&[("id", filter.as_str())])
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(store_error(res).await)
    }
}
