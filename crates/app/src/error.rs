use cuan_client::{AuthError, InvalidBaseUrl, MutationError, SyncError};
use engine::InputError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("unknown timezone {0:?}")]
    Timezone(String),
    #[error(transparent)]
    BaseUrl(#[from] InvalidBaseUrl),
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}
