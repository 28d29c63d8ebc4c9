//! Offer preparation for a publishing client.
//!
//! Wraps the enhancer in the enhance-then-validate policy a publisher applies
//! between `createOffer` and `setLocalDescription`:
//!
//! | Mode | Rewrite | Validation | On failure |
//! |------|---------|------------|------------|
//! | [`EnhanceMode::Auto`] | yes | corruption, unmatched codec | keep the original offer |
//! | [`EnhanceMode::Always`] | yes | no | n/a |
//! | [`EnhanceMode::Off`] | no | no | n/a |

use std::fmt;
use std::str::FromStr;

use crate::enhancer::{EnhancedSdp, SdpEnhancer};
use crate::error::EnhanceError;
use crate::profile::Profile;
use crate::sdp::corruption::is_corrupted;
use crate::sdp::rewriter::EnhancementRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnhanceMode {
    /// Rewrite, and fall back to the original offer if the result looks
    /// corrupted or a configured codec was not offered.
    #[default]
    Auto,
    /// Rewrite unconditionally.
    Always,
    /// Send the browser's offer as-is.
    Off,
}

impl FromStr for EnhanceMode {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "true" | "on" => Ok(Self::Always),
            "off" | "false" => Ok(Self::Off),
            _ => Err(EnhanceError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for EnhanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Publisher-level offer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherConfig {
    pub video_profile: Profile,
    pub audio_profile: Profile,
    /// Video bitrate in kbps (`b=CT`/`b=AS` and x-google fmtp hints).
    pub video_bitrate: Option<u32>,
    /// Audio bitrate in kbps.
    pub audio_bitrate: Option<u32>,
    pub video_frame_rate: Option<f64>,
    pub enhance_mode: EnhanceMode,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            video_profile: Profile::H264Baseline,
            audio_profile: Profile::Codec("opus".to_string()),
            video_bitrate: None,
            audio_bitrate: None,
            video_frame_rate: None,
            enhance_mode: EnhanceMode::Auto,
        }
    }
}

impl PublisherConfig {
    pub fn enhancement_request(&self) -> EnhancementRequest {
        EnhancementRequest {
            audio_bitrate: self.audio_bitrate,
            video_bitrate: self.video_bitrate,
            video_frame_rate: self.video_frame_rate,
        }
    }

    pub fn enhancer(&self) -> SdpEnhancer {
        SdpEnhancer::new(self.video_profile.clone(), self.audio_profile.clone())
    }
}

/// What happened to an offer on its way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Enhanced,
    /// The rewrite was unusable and the original offer was kept.
    Reverted,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOffer {
    pub sdp: String,
    pub outcome: OfferOutcome,
}

/// Apply the configured enhance policy to a browser offer.
pub fn prepare_offer(original: &str, config: &PublisherConfig) -> PreparedOffer {
    if config.enhance_mode == EnhanceMode::Off {
        return PreparedOffer {
            sdp: original.to_string(),
            outcome: OfferOutcome::Skipped,
        };
    }

    let enhancer = config.enhancer();
    let enhanced = enhancer.enhance(original, &config.enhancement_request());
    settle(original, enhanced, config.enhance_mode)
}

/// Decide between the rewritten and the original offer.
fn settle(original: &str, enhanced: EnhancedSdp, mode: EnhanceMode) -> PreparedOffer {
    if mode == EnhanceMode::Auto {
        let reason = if !enhanced.is_complete() {
            Some("no payload matches the configured profile")
        } else if is_corrupted(&enhanced.sdp) {
            Some("enhanced SDP is corrupted")
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::info!(unmatched = ?enhanced.unmatched, "{reason}, reverting to original offer");
            return PreparedOffer {
                sdp: original.to_string(),
                outcome: OfferOutcome::Reverted,
            };
        }
    }

    tracing::debug!(%mode, "enhanced SDP is valid");
    PreparedOffer {
        sdp: enhanced.sdp,
        outcome: OfferOutcome::Enhanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdp::dialect::Dialect;
    use crate::sdp::selector::Selection;

    #[test]
    fn parses_modes() {
        assert_eq!("auto".parse::<EnhanceMode>().unwrap(), EnhanceMode::Auto);
        assert_eq!("TRUE".parse::<EnhanceMode>().unwrap(), EnhanceMode::Always);
        assert_eq!("always".parse::<EnhanceMode>().unwrap(), EnhanceMode::Always);
        assert_eq!("false".parse::<EnhanceMode>().unwrap(), EnhanceMode::Off);
        assert!(matches!(
            "sometimes".parse::<EnhanceMode>(),
            Err(EnhanceError::InvalidMode(_))
        ));
    }

    #[test]
    fn default_config_matches_publisher_profiles() {
        let config = PublisherConfig::default();
        assert_eq!(config.video_profile, Profile::H264Baseline);
        assert_eq!(config.audio_profile.token(), "opus");
        assert_eq!(config.enhance_mode, EnhanceMode::Auto);
        assert_eq!(config.enhancement_request(), EnhancementRequest::default());
    }

    #[test]
    fn off_returns_original() {
        let config = PublisherConfig {
            enhance_mode: EnhanceMode::Off,
            video_bitrate: Some(1500),
            ..Default::default()
        };
        let offer = "v=0\r\nm=video 9 RTP/AVP 96\r\na=mid:1\r\n";
        let prepared = prepare_offer(offer, &config);
        assert_eq!(prepared.outcome, OfferOutcome::Skipped);
        assert_eq!(prepared.sdp, offer);
    }

    #[test]
    fn auto_reverts_corrupted_rewrite() {
        let original = "v=0\r\na=rtcp-mux\r\n";
        let broken = EnhancedSdp {
            sdp: "v=0\r\n\r\nXYZa=rtpmap:96 VP8/90000\r\n".to_string(),
            selection: Selection::default(),
            dialect: Dialect::Other,
            unmatched: Vec::new(),
        };

        let prepared = settle(original, broken.clone(), EnhanceMode::Auto);
        assert_eq!(prepared.outcome, OfferOutcome::Reverted);
        assert_eq!(prepared.sdp, original);

        let prepared = settle(original, broken.clone(), EnhanceMode::Always);
        assert_eq!(prepared.outcome, OfferOutcome::Enhanced);
        assert_eq!(prepared.sdp, broken.sdp);
    }

    #[test]
    fn auto_reverts_when_codec_is_missing() {
        let offer = "v=0\r\n\
            m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
            a=rtcp-mux\r\n\
            a=rtpmap:96 VP8/90000\r\n";
        let config = PublisherConfig::default();

        let prepared = prepare_offer(offer, &config);
        assert_eq!(prepared.outcome, OfferOutcome::Reverted);
        assert_eq!(prepared.sdp, offer);

        let config = PublisherConfig {
            enhance_mode: EnhanceMode::Always,
            ..config
        };
        let prepared = prepare_offer(offer, &config);
        assert_eq!(prepared.outcome, OfferOutcome::Enhanced);
        assert_eq!(prepared.sdp, "v=0\r\nm=video 9 UDP/TLS/RTP/SAVPF 96\r\na=rtcp-mux\r\n");
    }

    #[test]
    fn auto_keeps_clean_rewrite() {
        let config = PublisherConfig {
            video_bitrate: Some(1500),
            ..Default::default()
        };
        let offer = "v=0\r\n\
            m=video 9 RTP/AVP 102\r\n\
            a=mid:1\r\n\
            a=rtcp-mux\r\n\
            a=rtpmap:102 H264/90000\r\n\
            a=fmtp:102 profile-level-id=42e01f\r\n";
        let prepared = prepare_offer(offer, &config);
        assert_eq!(prepared.outcome, OfferOutcome::Enhanced);
        assert_eq!(
            prepared.sdp,
            "v=0\r\n\
             m=video 9 RTP/AVP 102\r\n\
             a=mid:1\r\n\
             a=rtcp-mux\r\n\
             a=rtpmap:102 H264/90000\r\n\
             a=fmtp:102 x-google-min-bitrate=1500;x-google-max-bitrate=1500\r\n\
             a=fmtp:102 profile-level-id=42e01f\r\n"
        );
    }

    #[test]
    fn offer_without_payload_attributes_is_kept() {
        let config = PublisherConfig {
            video_bitrate: Some(1500),
            ..Default::default()
        };
        let prepared = prepare_offer("v=0\r\nm=video 9 RTP/AVP 96\r\na=mid:1\r\n", &config);
        assert_eq!(prepared.outcome, OfferOutcome::Enhanced);
        assert_eq!(
            prepared.sdp,
            "v=0\r\nm=video 9 RTP/AVP 96\r\na=mid:1\r\nb=CT:1500\r\nb=AS:1500\r\n"
        );
    }
}
