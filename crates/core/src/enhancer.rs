//! The full offer rewrite, stages 1 to 5 in order.

use crate::profile::Profile;
use crate::sdp::classifier::PayloadGroups;
use crate::sdp::dialect::Dialect;
use crate::sdp::insertion::{insert_audio, insert_video};
use crate::sdp::rewriter::{EnhancementRequest, rewrite_sections};
use crate::sdp::selector::{MediaKind, Selection, select_into};
use crate::sdp::{fixup, split_lines};

/// Output of one enhancement run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedSdp {
    /// Rewritten offer, CRLF-terminated lines.
    pub sdp: String,
    /// Payload ids chosen for the m-lines. Unset when regrouping was skipped or nothing matched.
    pub selection: Selection,
    pub dialect: Dialect,
    /// Media kinds whose payload attributes were pulled out of the offer but
    /// had no group matching the profile. Their m-lines are left without any
    /// `a=rtpmap`, so the rewrite should not be sent.
    pub unmatched: Vec<MediaKind>,
}

impl EnhancedSdp {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Rewrites browser offers toward a preferred audio and video codec.
///
/// Holds configuration only. All per-run state (payload groups, selection)
/// lives on the stack of [`enhance`](Self::enhance), so one instance can be
/// reused and shared across threads.
#[derive(Debug, Clone)]
pub struct SdpEnhancer {
    video_profile: Profile,
    audio_profile: Profile,
}

impl SdpEnhancer {
    pub fn new(video_profile: Profile, audio_profile: Profile) -> Self {
        Self {
            video_profile,
            audio_profile,
        }
    }

    /// Rewrite `sdp` and inject the constraints in `request`.
    ///
    /// Never fails: lines the engine does not understand pass through. Run
    /// [`is_corrupted`](crate::is_corrupted) on the result before sending it.
    pub fn enhance(&self, sdp: &str, request: &EnhancementRequest) -> EnhancedSdp {
        tracing::info!(
            video = %self.video_profile,
            audio = %self.audio_profile,
            "enhancing SDP"
        );

        let dialect = Dialect::classify(sdp);
        let mut selection = Selection::default();
        let mut unmatched = Vec::new();

        let lines = if dialect.needs_regrouping(&self.video_profile) {
            let partition = PayloadGroups::partition(sdp);
            if partition.groups.is_empty() {
                tracing::debug!("offer declares no payload attributes");
            }

            let audio = select_into(
                &partition.groups,
                &self.audio_profile,
                MediaKind::Audio,
                &mut selection,
            );
            let video = select_into(
                &partition.groups,
                &self.video_profile,
                MediaKind::Video,
                &mut selection,
            );

            for (kind, group) in [(MediaKind::Audio, &audio), (MediaKind::Video, &video)] {
                if group.is_none()
                    && !partition.groups.is_empty()
                    && partition.kept.iter().any(|line| kind.is_media_line(line))
                {
                    unmatched.push(kind);
                }
            }

            let lines = insert_audio(partition.kept, audio.as_ref());
            insert_video(lines, video.as_ref())
        } else {
            tracing::debug!(?dialect, "keeping native payload layout");
            split_lines(sdp)
        };

        let mut sdp = rewrite_sections(&lines, &selection, request);
        if self.video_profile.forces_h264() {
            sdp = fixup::force_h264(&sdp).into_owned();
        }

        EnhancedSdp {
            sdp,
            selection,
            dialect,
            unmatched,
        }
    }
}
