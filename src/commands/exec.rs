//! The run → compose → send pipeline.

use crate::compose::{self, Limits, NotificationPayload};
use crate::context::ServiceContext;
use crate::error::Error;
use crate::ports::Receipt;
use crate::runner::{ExecutionResult, ProcessRunner};

/// Everything one pipeline pass produced.
#[derive(Debug)]
pub struct Report {
    /// How the command went.
    pub result: ExecutionResult,
    /// The notification built from it.
    pub payload: NotificationPayload,
    /// Delivery receipt; `None` when sending was skipped.
    pub receipt: Option<Receipt>,
}

/// Runs `command`, composes its notification, and sends it unless `skip_send`.
///
/// # Errors
///
/// Returns the runner's error if the command cannot be started or captured,
/// and [`Error::Delivery`] if the notifier fails.
pub async fn run(
    ctx: &ServiceContext,
    runner: &ProcessRunner,
    command: &[String],
    skip_send: bool,
) -> Result<Report, Error> {
    let result = runner.run(command).await?;
    let payload = compose::compose(&result, Limits::PUSHOVER);
    tracing::debug!(
        title = %payload.title,
        body_bytes = payload.body.len(),
        attachment_bytes = payload.attachment.as_ref().map_or(0, |a| a.bytes.len()),
        "composed notification"
    );

    if skip_send {
        return Ok(Report { result, payload, receipt: None });
    }

    let receipt = ctx
        .notifier
        .send(&payload, &ctx.recipient)
        .await
        .map_err(|e| Error::Delivery(e.to_string()))?;
    tracing::debug!(status = receipt.status, request = %receipt.request, "notification delivered");

    Ok(Report { result, payload, receipt: Some(receipt) })
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, DEFAULT_API_URL};
    use crate::ports::{Notifier, NotifyFuture, Recipient};

    #[derive(Clone, Default)]
    struct CountingNotifier {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Notifier for CountingNotifier {
        fn send<'a>(
            &'a self,
            _payload: &'a NotificationPayload,
            _recipient: &'a Recipient,
        ) -> NotifyFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result: Result<Receipt, Box<dyn std::error::Error + Send + Sync>> = if self.fail {
                Err("service unavailable".into())
            } else {
                Ok(Receipt { status: 1, request: "req".into() })
            };
            Box::pin(async move { result })
        }
    }

    fn config() -> Config {
        Config {
            api_token: "tok".into(),
            user_key: "usr".into(),
            device: None,
            api_url: DEFAULT_API_URL.into(),
            debug: false,
            skip_send: false,
            record_dir: None,
            replay_path: None,
        }
    }

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn sends_composed_notification() {
        let notifier = CountingNotifier::default();
        let ctx = ServiceContext::with_notifier(&config(), Box::new(notifier.clone()));

        let report =
            run(&ctx, &ProcessRunner::capture_only(), &cmd(&["echo", "hi"]), false).await.unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.payload.body, "hi\n");
        assert!(report.payload.title.starts_with("✅ "));
        assert_eq!(report.receipt.unwrap().request, "req");
    }

    #[tokio::test]
    async fn skip_send_never_invokes_notifier() {
        let notifier = CountingNotifier::default();
        let ctx = ServiceContext::with_notifier(&config(), Box::new(notifier.clone()));

        let report =
            run(&ctx, &ProcessRunner::capture_only(), &cmd(&["false"]), true).await.unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
        assert!(report.receipt.is_none());
        assert!(report.payload.title.starts_with("❌ exit 1"));
        assert_eq!(report.payload.body, "");
    }

    #[tokio::test]
    async fn delivery_failure_is_fatal() {
        let notifier = CountingNotifier { fail: true, ..CountingNotifier::default() };
        let ctx = ServiceContext::with_notifier(&config(), Box::new(notifier));

        let err = run(&ctx, &ProcessRunner::capture_only(), &cmd(&["true"]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Delivery(ref msg) if msg == "service unavailable"));
    }

    #[tokio::test]
    async fn start_failure_sends_nothing() {
        let notifier = CountingNotifier::default();
        let ctx = ServiceContext::with_notifier(&config(), Box::new(notifier.clone()));

        let err = run(
            &ctx,
            &ProcessRunner::capture_only(),
            &cmd(&["notify-exec-definitely-not-a-real-binary"]),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ProcessStart { .. }));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_failure_output_is_attached() {
        let notifier = CountingNotifier::default();
        let ctx = ServiceContext::with_notifier(&config(), Box::new(notifier));

        let report = run(
            &ctx,
            &ProcessRunner::capture_only(),
            &cmd(&["sh", "-c", "head -c 5000 /dev/zero | tr '\\0' e >&2; exit 3"]),
            false,
        )
        .await
        .unwrap();

        let attachment = report.payload.attachment.expect("attachment");
        assert_eq!(attachment.bytes.len(), 5000);
        assert!(report.payload.body.len() <= Limits::PUSHOVER.body_max);
        assert!(report.payload.title.starts_with("❌ exit 3"));
    }
}
