//! Cassette data structures for recording and replaying port interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `"notifier"`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// What was sent to the port.
    pub input: serde_json::Value,
    /// What the port returned, using the `{"Ok": ..}` / `{"Err": ..}` convention.
    pub output: serde_json::Value,
}

/// A recorded run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording was written.
    pub recorded_at: DateTime<Utc>,
    /// The wrapped command line, for orientation when reading the file.
    #[serde(default)]
    pub command: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Parses a cassette from YAML.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when `yaml` is not a valid cassette.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }
}
