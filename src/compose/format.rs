//! Text helpers for titles and bodies.

use std::fmt::Write;
use std::time::Duration;

/// Renders a command line the way a shell user would type it.
///
/// Arguments made only of shell-safe characters are left bare; anything
/// else is single-quoted.
#[must_use]
pub fn shell_join(command: &[String]) -> String {
    command.iter().map(|arg| shell_quote(arg)).collect::<Vec<_>>().join(" ")
}

fn shell_quote(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    let safe = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%^".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Compact rendering of a CPU time: `0s`, `850µs`, `12.5ms`, `1.204s`, `2m3.5s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros == 0 {
        return if duration.is_zero() { "0s".into() } else { format!("{}ns", duration.as_nanos()) };
    }
    if micros < 1_000 {
        return format!("{micros}µs");
    }
    if micros < 1_000_000 {
        return format!("{}ms", decimal(micros / 1_000, micros % 1_000, 3));
    }

    let total_secs = duration.as_secs();
    let frac_micros = u128::from(duration.subsec_micros());
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let secs = u128::from(total_secs % 60);

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    // Millisecond precision is plenty above one second.
    let _ = write!(out, "{}s", decimal(secs, frac_micros / 1_000, 3));
    out
}

/// `whole.frac` with `frac` zero-padded to `digits`, trailing zeros removed.
fn decimal(whole: u128, frac: u128, digits: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
#[must_use]
pub fn head(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Longest suffix of `s` that is at most `max` bytes and starts on a char boundary.
#[must_use]
pub fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
