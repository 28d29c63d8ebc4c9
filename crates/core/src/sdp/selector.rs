//! Stage 2: pick the payload group matching a configured profile.

use std::fmt;

use super::classifier::{PayloadGroup, PayloadGroups};
use super::{is_audio_media_line, is_congestion_feedback, is_video_media_line};
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Payload-type ids chosen during one enhancement run.
///
/// An unset id leaves the corresponding m-line untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub audio: Option<u32>,
    pub video: Option<u32>,
}

impl MediaKind {
    /// Whether `line` opens a media section of this kind.
    pub fn is_media_line(self, line: &str) -> bool {
        match self {
            Self::Audio => is_audio_media_line(line),
            Self::Video => is_video_media_line(line),
        }
    }
}

impl Selection {
    pub fn get(&self, kind: MediaKind) -> Option<u32> {
        match kind {
            MediaKind::Audio => self.audio,
            MediaKind::Video => self.video,
        }
    }

    pub fn set(&mut self, kind: MediaKind, id: u32) {
        match kind {
            MediaKind::Audio => self.audio = Some(id),
            MediaKind::Video => self.video = Some(id),
        }
    }
}

/// The first payload group in ascending id order that satisfies `profile`.
///
/// For [`Profile::Vpx`] the returned block has its congestion-control
/// feedback lines (`transport-cc`, `goog-remb`, `nack`) removed. Other
/// profiles get the block unmodified.
pub fn select(groups: &PayloadGroups, profile: &Profile) -> Option<PayloadGroup> {
    let mut group = groups
        .iter()
        .map(|(id, lines)| PayloadGroup {
            id,
            lines: lines.to_vec(),
        })
        .find(|group| profile.matches(&group.text()))?;

    if profile.is_vpx() {
        group.lines.retain(|line| !is_congestion_feedback(line));
    }
    Some(group)
}

/// [`select`], recording the chosen id for `kind` in `selection`.
pub fn select_into(
    groups: &PayloadGroups,
    profile: &Profile,
    kind: MediaKind,
    selection: &mut Selection,
) -> Option<PayloadGroup> {
    match select(groups, profile) {
        Some(group) => {
            tracing::debug!(%kind, %profile, payload_type = group.id, "payload selected");
            selection.set(kind, group.id);
            Some(group)
        }
        None => {
            tracing::warn!(%kind, %profile, groups = groups.len(), "no payload group matches profile");
            None
        }
    }
}
