//! Turns an [`ExecutionResult`] into a size-bounded notification.

pub mod format;

use serde::{Deserialize, Serialize};

use crate::runner::ExecutionResult;

/// Appended to a title whose command had to be cut.
pub const TRUNCATION_MARKER: &str = " (sic...)";

const SUCCESS_GLYPH: &str = "✅";
const FAILURE_GLYPH: &str = "❌";
const ATTACHMENT_NAME: &str = "output.txt";
const ATTACHMENT_TYPE: &str = "text/plain";

/// Size limits imposed by the delivery service, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum title length.
    pub title_max: usize,
    /// Maximum message body length.
    pub body_max: usize,
    /// Maximum attachment size.
    pub attachment_max: usize,
}

impl Limits {
    /// Pushover's message limits.
    pub const PUSHOVER: Self = Self { title_max: 250, body_max: 1024, attachment_max: 2_621_440 };
}

impl Default for Limits {
    fn default() -> Self {
        Self::PUSHOVER
    }
}

/// File shipped alongside the message when the output is too long to inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: String,
    /// Raw contents.
    pub bytes: Vec<u8>,
}

/// A composed notification, ready for a [`crate::ports::Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Outcome glyph, exit code, CPU time, and command line.
    pub title: String,
    /// Command output, or its tail when the output is attached.
    pub body: String,
    /// Full output when it does not fit in the body.
    pub attachment: Option<Attachment>,
}

/// Builds the notification for `result` within `limits`.
///
/// Successful runs report stdout only; failed runs report stdout and stderr
/// together. When that content exceeds the body limit it is attached in full
/// and the body carries its last `body_max` bytes.
#[must_use]
pub fn compose(result: &ExecutionResult, limits: Limits) -> NotificationPayload {
    let prefix = status_prefix(result);
    let title = build_title(&prefix, &format::shell_join(&result.command), limits.title_max);

    let content = if result.success() { &result.stdout } else { &result.combined };
    let text = String::from_utf8_lossy(content);

    // Lossy decoding can grow invalid input, so measure the decoded text.
    let (body, attachment) = if text.len() > limits.body_max {
        let body = format::tail(&text, limits.body_max).to_string();
        (body, Some(build_attachment(content, limits.attachment_max)))
    } else {
        (text.into_owned(), None)
    };

    NotificationPayload { title, body, attachment }
}

/// `"✅ exit 0 (1.2ms): "` or `"❌ exit 2 (1.2ms): "`.
#[must_use]
pub fn status_prefix(result: &ExecutionResult) -> String {
    let glyph = if result.success() { SUCCESS_GLYPH } else { FAILURE_GLYPH };
    format!(
        "{glyph} exit {} ({}): ",
        result.exit_code,
        format::format_duration(result.user_time)
    )
}

/// Joins `prefix` and `command`, cutting the command so the title fits `title_max`.
#[must_use]
pub fn build_title(prefix: &str, command: &str, title_max: usize) -> String {
    if prefix.len() + command.len() <= title_max {
        return format!("{prefix}{command}");
    }

    let trim_index = title_max.saturating_sub(prefix.len() + TRUNCATION_MARKER.len());
    let title = format!("{prefix}{}{TRUNCATION_MARKER}", format::head(command, trim_index));
    if title.len() <= title_max {
        return title;
    }

    tracing::warn!(title_max, prefix_len = prefix.len(), "title prefix alone exceeds the limit");
    format::head(&title, title_max).to_string()
}

fn build_attachment(content: &[u8], attachment_max: usize) -> Attachment {
    let bytes = if content.len() > attachment_max {
        tracing::warn!(
            size = content.len(),
            attachment_max,
            "output exceeds attachment limit; attaching its tail"
        );
        content[content.len() - attachment_max..].to_vec()
    } else {
        content.to_vec()
    };
    Attachment {
        file_name: ATTACHMENT_NAME.to_string(),
        content_type: ATTACHMENT_TYPE.to_string(),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn result(command: &[&str], exit_code: i32, stdout: &[u8], combined: &[u8]) -> ExecutionResult {
        ExecutionResult {
            command: command.iter().map(ToString::to_string).collect(),
            exit_code,
            user_time: Duration::from_micros(1_500),
            stdout: stdout.to_vec(),
            combined: combined.to_vec(),
        }
    }

    #[test]
    fn echo_hi_reports_stdout_with_success_glyph() {
        let payload = compose(&result(&["echo", "hi"], 0, b"hi\n", b"hi\n"), Limits::default());

        assert!(payload.title.starts_with("✅ "));
        assert_eq!(payload.title, "✅ exit 0 (1.5ms): echo hi");
        assert_eq!(payload.body, "hi\n");
        assert!(payload.attachment.is_none());
    }

    #[test]
    fn silent_failure_has_failure_title_and_empty_body() {
        let payload = compose(&result(&["false"], 1, b"", b""), Limits::default());

        assert!(payload.title.starts_with("❌ exit 1"));
        assert_eq!(payload.body, "");
        assert!(payload.attachment.is_none());
    }

    #[test]
    fn failure_title_contains_exit_code() {
        for code in [1, 2, 42, 127, 137, 255, -1] {
            let payload = compose(&result(&["make"], code, b"", b""), Limits::default());
            assert!(payload.title.starts_with(FAILURE_GLYPH));
            assert!(payload.title.contains(&format!("exit {code} ")));
        }
    }

    #[test]
    fn success_uses_stdout_and_failure_uses_combined() {
        let ok = compose(&result(&["x"], 0, b"out\n", b"out\nwarn\n"), Limits::default());
        assert_eq!(ok.body, "out\n");

        let failed = compose(&result(&["x"], 3, b"out\n", b"out\nboom\n"), Limits::default());
        assert_eq!(failed.body, "out\nboom\n");
    }

    #[test]
    fn oversized_output_is_attached_regardless_of_exit_code() {
        let limits = Limits::default();
        let big = vec![b'x'; limits.body_max + 1];

        for code in [0, 1] {
            let payload = compose(&result(&["yes"], code, &big, &big), limits);
            let attachment = payload.attachment.expect("attachment for oversized output");
            assert_eq!(attachment.bytes, big);
            assert_eq!(attachment.file_name, "output.txt");
            assert_eq!(payload.body.len(), limits.body_max);
        }
    }

    #[test]
    fn output_exactly_at_limit_stays_inline() {
        let limits = Limits::default();
        let exact = vec![b'y'; limits.body_max];
        let payload = compose(&result(&["yes"], 0, &exact, &exact), limits);

        assert!(payload.attachment.is_none());
        assert_eq!(payload.body.len(), limits.body_max);
    }

    #[test]
    fn oversized_body_keeps_the_tail_on_a_char_boundary() {
        let limits = Limits { title_max: 250, body_max: 10, attachment_max: 1_000 };
        let content = "ééééééééé-end".as_bytes();
        let payload = compose(&result(&["x"], 0, content, content), limits);

        assert!(payload.body.len() <= limits.body_max);
        assert!(payload.body.ends_with("-end"));
        assert_eq!(payload.attachment.unwrap().bytes, content);
    }

    #[test]
    fn attachment_is_capped_to_its_tail() {
        let limits = Limits { title_max: 250, body_max: 4, attachment_max: 8 };
        let payload = compose(&result(&["x"], 0, b"0123456789ABCDEF", b""), limits);

        assert_eq!(payload.attachment.unwrap().bytes, b"89ABCDEF");
        assert_eq!(payload.body, "CDEF");
    }

    #[test]
    fn long_command_is_truncated_to_exact_title_max() {
        let limits = Limits::default();
        let long_arg = "a".repeat(400);
        let res = result(&["echo", &long_arg], 0, b"", b"");
        let payload = compose(&res, limits);

        let prefix = status_prefix(&res);
        let cmd_str = format!("echo {long_arg}");
        let trim_index = limits.title_max - prefix.len() - TRUNCATION_MARKER.len();
        assert_eq!(payload.title, format!("{prefix}{}{TRUNCATION_MARKER}", &cmd_str[..trim_index]));
        assert_eq!(payload.title.len(), limits.title_max);
    }

    #[test]
    fn title_that_fits_is_not_truncated() {
        let title = build_title("✅ exit 0 (0s): ", "ls", 250);
        assert_eq!(title, "✅ exit 0 (0s): ls");
    }

    #[test]
    fn title_never_exceeds_max_even_when_prefix_is_too_long() {
        for max in [0, 5, 12, 20, 26] {
            let title = build_title("❌ exit 1 (1.5ms): ", "cargo build --release", max);
            assert!(title.len() <= max, "title {title:?} exceeds {max}");
        }
    }

    #[test]
    fn body_and_title_are_bounded_for_arbitrary_sizes() {
        let limits = Limits { title_max: 40, body_max: 16, attachment_max: 64 };
        for size in [0, 1, 15, 16, 17, 64, 65, 500] {
            let content = "é".repeat(size);
            let command = "z".repeat(size);
            let exit_code = i32::from(size % 2 == 0);
            let res = result(&["run", &command], exit_code, content.as_bytes(), content.as_bytes());
            let payload = compose(&res, limits);
            assert!(payload.title.len() <= limits.title_max);
            assert!(payload.body.len() <= limits.body_max);
            assert_eq!(payload.attachment.is_some(), content.len() > limits.body_max);
        }
    }

    #[test]
    fn invalid_utf8_that_grows_when_decoded_is_still_bounded() {
        let limits = Limits { title_max: 250, body_max: 8, attachment_max: 64 };
        let raw = [0xffu8; 6];
        let payload = compose(&result(&["x"], 1, b"", &raw), limits);

        assert!(payload.body.len() <= limits.body_max);
        assert!(payload.body.starts_with('\u{fffd}'));
        assert_eq!(payload.attachment.unwrap().bytes, raw);
    }
}
