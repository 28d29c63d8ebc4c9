//! Stage 6: advisory check for mis-joined output.

use std::sync::LazyLock;

use regex::Regex;

/// A blank line followed by text that runs into a `<letter>=` field without
/// its own line start, the shape left behind by a bad block insertion.
static MISJOINED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n\r\n[^=]+[a-z]=").expect("static corruption pattern"));

/// Returns `true` if the SDP looks structurally damaged.
///
/// This is a heuristic, not a grammar check. A `true` result means the caller
/// should discard the rewritten SDP and keep the original offer.
pub fn is_corrupted(sdp: &str) -> bool {
    MISJOINED.is_match(sdp)
}
