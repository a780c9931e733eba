//! Error layering from the store up to the Discord command surface.

use thiserror::Error;

use crate::dao::StoreError;

/// Errors from service-layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The SQLite store failed.
    #[error("storage failure")]
    Store(#[from] StoreError),
    /// Chart rendering failed.
    #[error("chart rendering failed: {0}")]
    Chart(String),
}

/// Top-level error type for command handlers. Errors that reach this level
/// are logged by the framework error hook; users get no diagnostic detail.
#[derive(Debug, Error)]
pub enum BotError {
    /// A service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The Discord API returned an error.
    #[error(transparent)]
    Discord(#[from] poise::serenity_prelude::Error),
}

impl From<StoreError> for BotError {
    fn from(err: StoreError) -> Self {
        BotError::Service(ServiceError::Store(err))
    }
}
