//! Runtime configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use canvas::doc::BoardId;
use tracing::warn;

pub const DEFAULT_CONTENT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Board to open. A fresh id is generated when unset.
    pub board_id: Option<BoardId>,
    /// JSON array of notes used to seed the store.
    pub snapshot: Option<PathBuf>,
    /// Quiet period before a content edit is written.
    pub content_debounce: Duration,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `NOTEBOARD_BOARD_ID`: uuid of the board to open
    /// - `NOTEBOARD_SNAPSHOT`: path to a JSON array of notes
    /// - `NOTEBOARD_CONTENT_DEBOUNCE_MS`: default 1000
    /// - `NOTEBOARD_VIEWPORT_WIDTH` / `NOTEBOARD_VIEWPORT_HEIGHT`: default 1280×800
    #[must_use]
    pub fn from_env() -> Self {
        let board_id = match std::env::var("NOTEBOARD_BOARD_ID") {
            Ok(raw) => match raw.parse::<BoardId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(value = %raw, error = %e, "ignoring invalid NOTEBOARD_BOARD_ID");
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            board_id,
            snapshot: std::env::var_os("NOTEBOARD_SNAPSHOT").map(PathBuf::from),
            content_debounce: Duration::from_millis(env_parse(
                "NOTEBOARD_CONTENT_DEBOUNCE_MS",
                DEFAULT_CONTENT_DEBOUNCE_MS,
            )),
            viewport_width: env_extent("NOTEBOARD_VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH),
            viewport_height: env_extent("NOTEBOARD_VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_id: None,
            snapshot: None,
            content_debounce: Duration::from_millis(DEFAULT_CONTENT_DEBOUNCE_MS),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse a viewport extent; only finite positive values are accepted.
fn env_extent(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if value.is_finite() && value > 0.0 {
        return value;
    }
    warn!(key, value, "ignoring non-finite or non-positive viewport size");
    default
}
