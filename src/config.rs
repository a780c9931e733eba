//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the bot looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CROSSWORD_BOT_CONFIG_PATH";

const DEFAULT_DB_PATH: &str = "./Scoreboard.db";
const DEFAULT_PREFIX: &str = "%";
const DEFAULT_ROLE: &str = "crosswords";
const DEFAULT_PUZZLE_LINK: &str = "https://www.nytimes.com/crosswords/game/mini";
const DEFAULT_DELETION_TIMEOUT_SECS: u64 = 30;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Prefix that introduces text commands.
    pub command_prefix: String,
    /// Role a member needs to use the scoreboard commands.
    pub crossword_role: String,
    /// URL the `link` command replies with.
    pub puzzle_link: String,
    deletion_timeout_secs: u64,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults
    /// when the file is absent or unreadable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found; using built-in defaults");
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// How long the deletion menu waits for a reply.
    pub fn deletion_timeout(&self) -> Duration {
        Duration::from_secs(self.deletion_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            command_prefix: DEFAULT_PREFIX.into(),
            crossword_role: DEFAULT_ROLE.into(),
            puzzle_link: DEFAULT_PUZZLE_LINK.into(),
            deletion_timeout_secs: DEFAULT_DELETION_TIMEOUT_SECS,
        }
    }
}

/// Shape of the JSON configuration file; every field is optional.
#[derive(Debug, Deserialize)]
struct RawConfig {
    db_path: Option<PathBuf>,
    command_prefix: Option<String>,
    crossword_role: Option<String>,
    puzzle_link: Option<String>,
    deletion_timeout_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            db_path: raw.db_path.unwrap_or(defaults.db_path),
            command_prefix: raw.command_prefix.unwrap_or(defaults.command_prefix),
            crossword_role: raw.crossword_role.unwrap_or(defaults.crossword_role),
            puzzle_link: raw.puzzle_link.unwrap_or(defaults.puzzle_link),
            deletion_timeout_secs: raw
                .deletion_timeout_secs
                .unwrap_or(defaults.deletion_timeout_secs),
        }
    }
}

fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
