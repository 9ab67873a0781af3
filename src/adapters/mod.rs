//! Port implementations: live network access, recording, and replay.

pub mod live;
pub mod recording;
pub mod replaying;
