//! Stage 5: H.264 profile-level-id repair.
//!
//! Some Android builds (notably Huawei) advertise `42001f` (baseline) or
//! `64C016` (high) for an encoder that only negotiates reliably as
//! constrained baseline. Rewriting the first occurrence to `42e01f` makes
//! the far end accept the stream.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static MISREPORTED_PROFILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(profile-level-id)=(42001f|64C016)").expect("static profile-level-id pattern")
});

/// Rewrite the first misreported profile-level-id to constrained baseline.
///
/// Matching is case-insensitive; the attribute name keeps its original case.
pub fn force_h264(sdp: &str) -> Cow<'_, str> {
    let fixed = MISREPORTED_PROFILE.replace(sdp, "${1}=42e01f");
    if let Cow::Owned(_) = fixed {
        tracing::debug!("forced H.264 profile-level-id to 42e01f");
    }
    fixed
}
