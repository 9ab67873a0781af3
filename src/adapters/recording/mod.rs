//! Recording adapters that capture port interactions to cassettes.

pub mod notifier;

pub use notifier::RecordingNotifier;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Records a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// - `Ok(v)` is stored as `{"Ok": v}`
/// - `Err(e)` is stored as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or_default();
    let output_json = match result {
        Ok(v) => serde_json::json!({ "Ok": serde_json::to_value(v).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    recorder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record(port, method, input_json, output_json);
}
