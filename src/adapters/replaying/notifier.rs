//! Replaying adapter for the `Notifier` port.

use std::sync::{Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;
use crate::compose::NotificationPayload;
use crate::ports::{Notifier, NotifyFuture, Receipt, Recipient};

/// Serves recorded send results from a cassette instead of the network.
pub struct ReplayingNotifier {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingNotifier {
    /// Creates a replaying notifier from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_result(&self) -> Result<Receipt, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            replayer.next_interaction("notifier", "send")?.output.clone()
        };

        if let Some(err) = output.get("Err") {
            return Err(err.as_str().unwrap_or("unknown error").into());
        }
        let value = output.get("Ok").cloned().unwrap_or(output);
        serde_json::from_value(value)
            .map_err(|e| format!("recorded notifier output is not a receipt: {e}").into())
    }
}

impl Notifier for ReplayingNotifier {
    fn send<'a>(
        &'a self,
        payload: &'a NotificationPayload,
        _recipient: &'a Recipient,
    ) -> NotifyFuture<'a> {
        tracing::debug!(title = %payload.title, "replaying notifier send");
        let result = self.next_result();
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(outputs: Vec<serde_json::Value>) -> CassetteReplayer {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "notifier".into(),
                method: "send".into(),
                input: json!({}),
                output,
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            command: "true".into(),
            interactions,
        })
    }

    fn payload() -> NotificationPayload {
        NotificationPayload { title: "✅ exit 0 (0s): true".into(), body: String::new(), attachment: None }
    }

    fn recipient() -> Recipient {
        Recipient { user_key: "u".into(), device: None }
    }

    #[tokio::test]
    async fn replays_receipts_in_order() {
        let notifier = ReplayingNotifier::new(make_replayer(vec![
            json!({"Ok": {"status": 1, "request": "first"}}),
            json!({"Ok": {"status": 1, "request": "second"}}),
        ]));

        let first = notifier.send(&payload(), &recipient()).await.unwrap();
        let second = notifier.send(&payload(), &recipient()).await.unwrap();
        assert_eq!(first.request, "first");
        assert_eq!(second.request, "second");
    }

    #[tokio::test]
    async fn replays_recorded_error() {
        let notifier =
            ReplayingNotifier::new(make_replayer(vec![json!({"Err": "application token is invalid"})]));

        let err = notifier.send(&payload(), &recipient()).await.unwrap_err();
        assert_eq!(err.to_string(), "application token is invalid");
    }

    #[tokio::test]
    async fn exhausted_cassette_is_an_error() {
        let notifier = ReplayingNotifier::new(make_replayer(vec![]));

        let err = notifier.send(&payload(), &recipient()).await.unwrap_err();
        assert!(err.to_string().contains("notifier::send"));
    }
}
