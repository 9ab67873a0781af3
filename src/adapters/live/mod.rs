//! Live adapters for real external interactions.

pub mod pushover;

pub use pushover::LivePushoverClient;
