//! Stage 4: m-line payload substitution and bitrate/framerate injection.
//!
//! A single pass that tracks which section it is in:
//!
//! - `m=audio` / `m=video` with a selected id: payload list replaced by that
//!   id, nothing else happens for the line.
//! - `m=audio` / `m=video` otherwise: enters the audio or video section.
//! - `a=rtpmap`: enters the transient *bandwidth* section.
//!
//! At the first `a=mid:` or `a=rtpmap` of an audio or video section the
//! `b=CT`/`b=AS` (and for video `a=framerate`) lines are appended. Every
//! `a=rtpmap` in a bandwidth section may append an `x-google-*-bitrate` fmtp
//! line for its payload.

use std::sync::LazyLock;

use regex::Regex;

use super::selector::{MediaKind, Selection};
use super::{CRLF, is_audio_media_line, is_injection_anchor, is_rtpmap, is_video_media_line};

static RTPMAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"a=rtpmap:(\d+) (\w+)/(\d+)").expect("static rtpmap pattern")
});

/// Codecs (lower-cased encoding names) that receive the video bitrate fmtp hint.
const VIDEO_HINT_CODECS: &[&str] = &["vp9", "vp8", "h264", "red", "ulpfec", "rtx"];

/// Codecs (lower-cased encoding names) that receive the audio bitrate fmtp hint.
const AUDIO_HINT_CODECS: &[&str] = &["opus", "isac", "g722", "pcmu", "pcma", "cn"];

/// Bandwidth and framerate constraints to inject into an offer.
///
/// An absent field suppresses its lines entirely; there are no defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EnhancementRequest {
    /// Audio bitrate in kbps.
    pub audio_bitrate: Option<u32>,
    /// Video bitrate in kbps.
    pub video_bitrate: Option<u32>,
    /// Only emitted together with `video_bitrate`.
    pub video_frame_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Audio,
    Video,
    /// Entered at every `a=rtpmap`; selects the fmtp hint template.
    Bandwidth,
}

/// Fields captured from an `a=rtpmap:<pt> <encoding>/<clock>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rtpmap<'a> {
    pub payload_type: &'a str,
    pub encoding: &'a str,
}

impl<'a> Rtpmap<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = RTPMAP.captures(line)?;
        Some(Self {
            payload_type: caps.get(1)?.as_str(),
            encoding: caps.get(2)?.as_str(),
        })
    }
}

fn media_kind(line: &str) -> Option<MediaKind> {
    [MediaKind::Audio, MediaKind::Video]
        .into_iter()
        .find(|kind| kind.is_media_line(line))
}

/// `m=<media> <port> <proto> <id>`: the payload list collapses to the chosen id.
///
/// Returns `None` for an m-line without the three leading fields.
pub fn substitute_payload(line: &str, id: u32) -> Option<String> {
    let mut fields = line.split_whitespace();
    let (media, port, proto) = (fields.next()?, fields.next()?, fields.next()?);
    Some(format!("{media} {port} {proto} {id}"))
}

/// Injected lines go before the current line's terminator.
fn push_line(out: &mut String, line: &str) {
    out.push_str(CRLF);
    out.push_str(line);
}

fn push_bandwidth(out: &mut String, kbps: u32) {
    push_line(out, &format!("b=CT:{kbps}"));
    push_line(out, &format!("b=AS:{kbps}"));
}

fn bitrate_fmtp(pt: &str, kbps: u32) -> String {
    format!("a=fmtp:{pt} x-google-min-bitrate={kbps};x-google-max-bitrate={kbps}")
}

fn push_fmtp_hint(out: &mut String, rtpmap_line: &str, request: &EnhancementRequest) {
    let Some(rtpmap) = Rtpmap::parse(rtpmap_line) else {
        return;
    };
    let encoding = rtpmap.encoding.to_lowercase();
    let pt = rtpmap.payload_type;

    if let Some(kbps) = request.video_bitrate
        && VIDEO_HINT_CODECS.contains(&encoding.as_str())
    {
        push_line(out, &bitrate_fmtp(pt, kbps));
    }
    if let Some(kbps) = request.audio_bitrate
        && AUDIO_HINT_CODECS.contains(&encoding.as_str())
    {
        push_line(out, &bitrate_fmtp(pt, kbps));
    }
}

/// Rewrite the reassembled offer section by section.
pub fn rewrite_sections(lines: &[String], selection: &Selection, request: &EnhancementRequest) -> String {
    let mut out = String::new();
    let mut section = SectionKind::Header;
    let mut injected = false;

    for line in lines.iter().filter(|line| !line.is_empty()) {
        let patched = media_kind(line)
            .and_then(|kind| selection.get(kind))
            .and_then(|id| substitute_payload(line, id));
        if let Some(patched) = patched {
            out.push_str(&patched);
            out.push_str(CRLF);
            continue;
        }

        out.push_str(line);

        if is_audio_media_line(line) {
            section = SectionKind::Audio;
            injected = false;
        } else if is_video_media_line(line) {
            section = SectionKind::Video;
            injected = false;
        } else if is_rtpmap(line) {
            section = SectionKind::Bandwidth;
            injected = false;
        }

        if is_injection_anchor(line) && !injected {
            match section {
                SectionKind::Audio => {
                    if let Some(kbps) = request.audio_bitrate {
                        push_bandwidth(&mut out, kbps);
                    }
                    injected = true;
                }
                SectionKind::Video => {
                    if let Some(kbps) = request.video_bitrate {
                        push_bandwidth(&mut out, kbps);
                        if let Some(fps) = request.video_frame_rate {
                            push_line(&mut out, &format!("a=framerate:{fps}"));
                        }
                    }
                    injected = true;
                }
                SectionKind::Bandwidth => push_fmtp_hint(&mut out, line, request),
                SectionKind::Header => {}
            }
        }

        out.push_str(CRLF);
    }

    out
}
