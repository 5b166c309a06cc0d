use engine::InputError;
use thiserror::Error;

/// Failures of the Auth Provider. They abort the call that triggered them and
/// are never retried automatically.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("rejected by auth provider: {0}")]
    Rejected(String),
    #[error("auth provider error: {0}")]
    Provider(String),
    #[error("auth provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures of a single Remote Store request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden by access policy")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl StoreError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation(message),
            _ => Self::Server(message),
        }
    }
}

/// A resynchronization that did not replace the cache.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("fetch failed: {0}")]
    Fetch(#[from] StoreError),
}

/// A create or delete that did not go through.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("rejected by store: {0}")]
    Rejected(#[source] StoreError),
}

#[derive(Debug, Error)]
#[error("invalid base_url {url:?}: {reason}")]
pub struct InvalidBaseUrl {
    pub url: String,
    pub reason: String,
}
