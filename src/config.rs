//! Environment-backed configuration, read once at startup.

use std::path::PathBuf;

use crate::error::Error;

/// Pushover application token.
pub const API_TOKEN_VAR: &str = "PUSHOVER_API_TOKEN";
/// Pushover user or group key receiving the notification.
pub const USER_TOKEN_VAR: &str = "PUSHOVER_USER_TOKEN";
/// Enables debug logging.
pub const DEBUG_VAR: &str = "NOTIFY_EXEC_DEBUG";
/// Runs everything except the send step.
pub const SKIP_SEND_VAR: &str = "NOTIFY_EXEC_SKIP_SEND";
/// Restricts delivery to one of the user's devices.
pub const DEVICE_VAR: &str = "NOTIFY_EXEC_DEVICE";
/// Overrides the messages endpoint.
pub const API_URL_VAR: &str = "NOTIFY_EXEC_API_URL";
/// Directory receiving a cassette of the send interaction.
pub const RECORD_VAR: &str = "NOTIFY_EXEC_RECORD";
/// Cassette to serve the send interaction from instead of the network.
pub const REPLAY_VAR: &str = "NOTIFY_EXEC_REPLAY";

/// Default Pushover messages endpoint.
pub const DEFAULT_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Process-wide settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pushover application token.
    pub api_token: String,
    /// Recipient user or group key.
    pub user_key: String,
    /// Optional device name restricting delivery.
    pub device: Option<String>,
    /// Messages endpoint.
    pub api_url: String,
    /// Whether debug logging is on.
    pub debug: bool,
    /// Whether the send step is skipped.
    pub skip_send: bool,
    /// Directory to record the send interaction into.
    pub record_dir: Option<PathBuf>,
    /// Cassette to replay the send interaction from.
    pub replay_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is applied first; variables
    /// already present in the environment take precedence over it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when either credential is missing.
    pub fn from_env() -> Result<Self, Error> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when either credential is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (Some(api_token), Some(user_key)) = (non_empty(API_TOKEN_VAR), non_empty(USER_TOKEN_VAR))
        else {
            return Err(Error::Configuration(format!(
                "no api or user tokens found; ensure that the {API_TOKEN_VAR} and \
                 {USER_TOKEN_VAR} environment variables are set"
            )));
        };

        Ok(Self {
            api_token,
            user_key,
            device: non_empty(DEVICE_VAR),
            api_url: non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            debug: lookup(DEBUG_VAR).is_some_and(|v| parse_flag(&v)),
            skip_send: lookup(SKIP_SEND_VAR).is_some_and(|v| parse_flag(&v)),
            record_dir: non_empty(RECORD_VAR).map(PathBuf::from),
            replay_path: non_empty(REPLAY_VAR).map(PathBuf::from),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
