//! Text shaping for outgoing turns and incoming replies.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::attachment::Attachment;

pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I didn't understand that.";
pub const FAILURE_FALLBACK: &str = "Something went wrong.";

static BOLD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern compiles"));

/// Transcript text: the typed text plus a short file marker.
pub fn display_content(text: &str, attachment: Option<&Attachment>) -> String {
    match attachment {
        Some(file) => format!("{text}\n\n📎 File: {}", file.name),
        None => text.to_string(),
    }
}

/// Upstream text: the typed text plus the whole attachment body.
pub fn payload_content(text: &str, attachment: Option<&Attachment>) -> String {
    match attachment {
        Some(file) if !file.content.is_empty() => {
            format!("{text}\n\n[Attached File Content]:\n{}", file.content)
        }
        _ => text.to_string(),
    }
}

pub fn strip_bold(text: &str) -> String {
    BOLD_MARKERS.replace_all(text, "${1}").into_owned()
}

/// Final transcript text for a reply whose answer field may be missing.
pub fn reply_text(answer: Option<&str>) -> String {
    let answer = answer
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(EMPTY_REPLY_FALLBACK);
    strip_bold(answer)
}
