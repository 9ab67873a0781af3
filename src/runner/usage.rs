//! User-mode CPU time accounting for reaped children.

use std::time::Duration;

/// Total user CPU time of all terminated, waited-for children so far.
///
/// The runner takes a reading before spawning and after the wait; the
/// difference is the time charged to the child it ran.
#[cfg(unix)]
#[must_use]
pub fn children_user_time() -> Duration {
    use nix::sys::resource::{getrusage, UsageWho};

    match getrusage(UsageWho::RUSAGE_CHILDREN) {
        Ok(usage) => {
            let tv = usage.user_time();
            let secs = u64::try_from(tv.tv_sec()).unwrap_or(0);
            let micros = u64::try_from(tv.tv_usec()).unwrap_or(0);
            Duration::from_secs(secs) + Duration::from_micros(micros)
        }
        Err(err) => {
            tracing::debug!(error = %err, "getrusage failed; reporting zero user time");
            Duration::ZERO
        }
    }
}

/// User CPU time is not tracked on this platform.
#[cfg(not(unix))]
#[must_use]
pub fn children_user_time() -> Duration {
    Duration::ZERO
}
