//! Offer dialect detection.
//!
//! Firefox stamps its offers with `THIS_IS_SDPARTA` in the origin line and
//! already lists payload attributes in a shape the rewriter accepts, so the
//! regrouping passes are skipped for it unless the VPX family is requested.

use crate::profile::Profile;

/// Marker substring Firefox puts in the `o=` line.
pub const SDPARTA_MARKER: &str = "THIS_IS_SDPARTA";

/// Which browser family produced an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Firefox-style offer (`o=mozilla...THIS_IS_SDPARTA...`).
    LegacyFirefoxLike,
    Other,
}

impl Dialect {
    /// Classify a raw offer by its marker substring.
    pub fn classify(sdp: &str) -> Self {
        if sdp.contains(SDPARTA_MARKER) {
            Self::LegacyFirefoxLike
        } else {
            Self::Other
        }
    }

    /// Whether classification, selection and insertion run for this offer.
    pub fn needs_regrouping(self, video_profile: &Profile) -> bool {
        self == Self::Other || video_profile.is_vpx()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_firefox_marker() {
        let sdp = "v=0\r\no=mozilla...THIS_IS_SDPARTA-99.0 4294967295 0 IN IP4 0.0.0.0\r\n";
        assert_eq!(Dialect::classify(sdp), Dialect::LegacyFirefoxLike);
        assert_eq!(
            Dialect::classify("v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n"),
            Dialect::Other
        );
    }

    #[test]
    fn firefox_regroups_only_for_vpx() {
        let firefox = Dialect::LegacyFirefoxLike;
        assert!(firefox.needs_regrouping(&Profile::Vpx));
        assert!(!firefox.needs_regrouping(&Profile::H264Baseline));
        assert!(!firefox.needs_regrouping(&Profile::Codec("VP8".to_string())));
    }

    #[test]
    fn other_dialects_always_regroup() {
        assert!(Dialect::Other.needs_regrouping(&Profile::H264Baseline));
        assert!(Dialect::Other.needs_regrouping(&Profile::Vpx));
    }
}
