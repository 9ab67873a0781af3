//! Notifier port for delivering a composed notification.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::compose::NotificationPayload;

/// Boxed future type alias used by [`Notifier`] to keep the trait dyn-compatible.
pub type NotifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Receipt, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Who receives the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// User or group key.
    pub user_key: String,
    /// Optional device name; all devices when absent.
    pub device: Option<String>,
}

/// Acknowledgement returned by the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Service status code; `1` means accepted.
    pub status: i32,
    /// Request identifier assigned by the service.
    pub request: String,
}

/// Delivers notifications to a recipient.
pub trait Notifier: Send + Sync {
    /// Sends `payload` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, validation, etc.).
    fn send<'a>(&'a self, payload: &'a NotificationPayload, recipient: &'a Recipient)
        -> NotifyFuture<'a>;
}
