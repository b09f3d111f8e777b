//! xCAT response envelope
//!
//! A `dsh` call answers with
//! `{"data":[{"data":["<payload>",null]},{"errorcode":["<code>"]}]}` where the payload is the
//! `smcli` output with its newlines escaped as the two characters `\n`. The auxiliary member
//! after the payload (`null` or a second string) is optional.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Escaped newline inside the payload: a backslash followed by `n`, not a control character
pub const PAYLOAD_LINE_SEPARATOR: &str = r"\n";

// Greedy payload: it ends at the last quote that still lets the rest of the envelope match,
// so quotes and braces inside the payload are fine.
static ENVELOPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)^\{"data":\[\{"data":\["(?P<data>.+)"(?P<aux>.*)\]\},\{"errorcode":\["(?P<errorcode>.+)"\]\}\]\}"#,
    )
    .expect("Invalid xCAT envelope regex")
});

/// Borrowed view of a matched envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Escaped report text
    pub payload: &'a str,
    /// Value of the `errorcode` member
    pub error_code: &'a str,
}

/// Match `response` against the envelope shape
pub fn parse_envelope(response: &str) -> Option<Envelope<'_>> {
    let captures = ENVELOPE_REGEX.captures(response)?;
    Some(Envelope {
        payload: captures.name("data")?.as_str(),
        error_code: captures.name("errorcode")?.as_str(),
    })
}

/// Extract the report lines from an xCAT response
///
/// Returns an empty list when the response does not have the envelope shape, which includes
/// the empty string a failed request produces and envelopes with an empty payload.
pub fn extract(response: &str) -> Vec<String> {
    let Some(envelope) = parse_envelope(response) else {
        warn!(
            response_len = response.len(),
            "Failed to match xCAT response to the envelope pattern"
        );
        return Vec::new();
    };

    debug!(
        error_code = envelope.error_code,
        payload_len = envelope.payload.len(),
        "Extracted xCAT payload"
    );

    envelope
        .payload
        .split(PAYLOAD_LINE_SEPARATOR)
        .map(str::to_string)
        .collect()
}
