//! Shared application context injected into every command handler.

mod deletion;

pub use deletion::{DeletionOutcome, DeletionSessions, SessionError, SessionKey};

use crate::config::AppConfig;
use crate::dao::Database;

/// Application context constructed once at startup; the framework hands a
/// reference to every command invocation.
pub struct AppState {
    /// Immutable runtime configuration.
    pub config: AppConfig,
    /// Handle over the SQLite store.
    pub db: Database,
    /// Live interactive deletion conversations.
    pub deletions: DeletionSessions,
}

impl AppState {
    /// Bundle configuration and an opened database into the shared context.
    pub fn new(config: AppConfig, db: Database) -> Self {
        let deletions = DeletionSessions::new(config.deletion_timeout());
        Self {
            config,
            db,
            deletions,
        }
    }
}
