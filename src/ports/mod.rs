//! Port traits defining external boundaries.
//!
//! The only boundary with behavior worth substituting is notification
//! delivery. Implementations live in `src/adapters/`.

pub mod notifier;

pub use notifier::{Notifier, NotifyFuture, Receipt, Recipient};
