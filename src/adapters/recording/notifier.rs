//! Recording adapter for the `Notifier` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::compose::NotificationPayload;
use crate::ports::{Notifier, NotifyFuture, Recipient};

/// Records sends while delegating to an inner notifier.
pub struct RecordingNotifier {
    inner: Box<dyn Notifier>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingNotifier {
    /// Wraps `inner`, recording every send into `recorder`.
    pub fn new(inner: Box<dyn Notifier>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// What gets written for a send. Credentials and attachment bytes are left out.
#[derive(Serialize)]
struct SendInput<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<AttachmentSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
}

#[derive(Serialize)]
struct AttachmentSummary<'a> {
    file_name: &'a str,
    content_type: &'a str,
    size: usize,
}

impl<'a> SendInput<'a> {
    fn new(payload: &'a NotificationPayload, recipient: &'a Recipient) -> Self {
        Self {
            title: &payload.title,
            body: &payload.body,
            attachment: payload.attachment.as_ref().map(|a| AttachmentSummary {
                file_name: &a.file_name,
                content_type: &a.content_type,
                size: a.bytes.len(),
            }),
            device: recipient.device.as_deref(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send<'a>(
        &'a self,
        payload: &'a NotificationPayload,
        recipient: &'a Recipient,
    ) -> NotifyFuture<'a> {
        Box::pin(async move {
            let result = self.inner.send(payload, recipient).await;
            let input = SendInput::new(payload, recipient);
            record_result(&self.recorder, "notifier", "send", &input, &result);
            result
        })
    }
}
