//! Live adapter for the `Notifier` port using the Pushover messages API.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::compose::NotificationPayload;
use crate::ports::notifier::{Notifier, NotifyFuture, Receipt, Recipient};

/// Sent instead of an empty body, which the service rejects.
const EMPTY_MESSAGE: &str = "(no output)";

/// Live notifier that posts to Pushover.
pub struct LivePushoverClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl LivePushoverClient {
    /// Creates a client posting to `api_url` with the given application token.
    #[must_use]
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self { client: Client::new(), api_url: api_url.into(), api_token: api_token.into() }
    }

    fn form(
        &self,
        payload: &NotificationPayload,
        recipient: &Recipient,
    ) -> Result<Form, reqwest::Error> {
        let message =
            if payload.body.is_empty() { EMPTY_MESSAGE.to_string() } else { payload.body.clone() };

        let mut form = Form::new()
            .text("token", self.api_token.clone())
            .text("user", recipient.user_key.clone())
            .text("title", payload.title.clone())
            .text("message", message);

        if let Some(device) = &recipient.device {
            form = form.text("device", device.clone());
        }

        if let Some(attachment) = &payload.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)?;
            form = form.part("attachment", part);
        }

        Ok(form)
    }

    async fn post(
        &self,
        payload: &NotificationPayload,
        recipient: &Recipient,
    ) -> Result<Receipt, Box<dyn std::error::Error + Send + Sync>> {
        let form = self
            .form(payload, recipient)
            .map_err(|e| format!("Failed to build Pushover request: {e}"))?;

        tracing::debug!(url = %self.api_url, title = %payload.title, "posting notification");
        let response = self
            .client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Pushover API request failed: {e}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read Pushover API response: {e}"))?;

        Ok(parse_response(status.as_u16(), &response_text)?)
    }
}

/// Body returned by the messages endpoint, on success and on rejection.
#[derive(Deserialize)]
struct PushoverResponse {
    status: i32,
    #[serde(default)]
    request: String,
    #[serde(default)]
    errors: Vec<String>,
}

impl Notifier for LivePushoverClient {
    fn send<'a>(
        &'a self,
        payload: &'a NotificationPayload,
        recipient: &'a Recipient,
    ) -> NotifyFuture<'a> {
        Box::pin(self.post(payload, recipient))
    }
}

/// Interprets the endpoint's reply.
fn parse_response(http_status: u16, body: &str) -> Result<Receipt, String> {
    let parsed = serde_json::from_str::<PushoverResponse>(body);

    match parsed {
        Ok(resp) if (200..300).contains(&http_status) && resp.status == 1 => {
            Ok(Receipt { status: resp.status, request: resp.request })
        }
        Ok(resp) => {
            let detail = if resp.errors.is_empty() {
                format!("status {}", resp.status)
            } else {
                resp.errors.join("; ")
            };
            Err(format!("Pushover API error ({http_status}): {detail}"))
        }
        Err(e) if (200..300).contains(&http_status) => {
            Err(format!("Failed to parse Pushover API response: {e}"))
        }
        Err(_) => Err(format!("Pushover API error ({http_status}): {}", body.trim())),
    }
}
