//! Codec profile tokens used to pick a payload group out of an offer.
//!
//! | Token | Variant | Matches |
//! |-------|---------|---------|
//! | `VPX` | [`Profile::Vpx`] | any block mentioning `VP8` or `VP9` |
//! | `42e01f` | [`Profile::H264Baseline`] | blocks carrying `42e01f`; also enables the profile-level-id fix |
//! | anything else | [`Profile::Codec`] | blocks containing the token as a substring |

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EnhanceError, ProfileErrorKind};

/// Token for the VP8/VP9 family alias.
pub const VPX_TOKEN: &str = "VPX";

/// Token for constrained-baseline H.264, level 3.1.
pub const H264_BASELINE_TOKEN: &str = "42e01f";

static VPX_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VP(8|9)").expect("static VPX pattern"));

/// A configured codec preference for one media kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// VP8 or VP9, whichever the offer lists first.
    ///
    /// Matching blocks are stripped of congestion-control feedback lines.
    Vpx,
    /// H.264 constrained baseline (`profile-level-id=42e01f`).
    H264Baseline,
    /// Plain substring match on a codec name or parameter (`opus`, `VP9`, `H264`, ...).
    Codec(String),
}

impl Profile {
    /// The literal token as it appears in configuration.
    pub fn token(&self) -> &str {
        match self {
            Self::Vpx => VPX_TOKEN,
            Self::H264Baseline => H264_BASELINE_TOKEN,
            Self::Codec(token) => token,
        }
    }

    /// Returns `true` if a payload group's attribute text satisfies this profile.
    pub fn matches(&self, block: &str) -> bool {
        block.contains(self.token()) || (self.is_vpx() && VPX_FAMILY.is_match(block))
    }

    pub fn is_vpx(&self) -> bool {
        matches!(self, Self::Vpx)
    }

    /// Whether the final profile-level-id rewrite applies.
    pub fn forces_h264(&self) -> bool {
        matches!(self, Self::H264Baseline)
    }
}

impl FromStr for Profile {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(EnhanceError::InvalidProfile {
                reason: ProfileErrorKind::Empty,
            });
        }
        if token.contains(char::is_whitespace) {
            return Err(EnhanceError::InvalidProfile {
                reason: ProfileErrorKind::ContainsWhitespace(token.to_string()),
            });
        }

        Ok(match token {
            VPX_TOKEN => Self::Vpx,
            H264_BASELINE_TOKEN => Self::H264Baseline,
            other => Self::Codec(other.to_string()),
        })
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
