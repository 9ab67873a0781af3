//! Replaying adapters that serve recorded interactions.

pub mod notifier;

pub use notifier::ReplayingNotifier;
