//! Line-oriented SDP rewriting (RFC 8866 text, browser-generated offers).
//!
//! The engine never builds a full SDP model. It works on CRLF-delimited
//! lines and keys every decision off line prefixes:
//!
//! ```text
//! v=0
//! ...
//! m=audio 9 UDP/TLS/RTP/SAVPF 111 0 8     ← media section, payload list
//! a=mid:0                                 ← bitrate injection anchor
//! a=rtcp-mux                              ← audio block insertion anchor
//! a=rtpmap:111 opus/48000/2               ┐
//! a=rtcp-fb:111 transport-cc              ├ payload group 111
//! a=fmtp:111 minptime=10;useinbandfec=1   ┘
//! m=video 9 UDP/TLS/RTP/SAVPF 96 97
//! a=mid:1
//! a=rtcp-mux
//! a=rtcp-rsize                            ← video block insertion anchor
//! a=rtpmap:96 VP8/90000
//! ...
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Pass |
//! |-------|--------|------|
//! | Dialect detection | [`dialect`] | decides whether stages 1 to 3 run |
//! | 1. Line classifier | [`classifier`] | splits payload attributes into groups |
//! | 2. Payload selector | [`selector`] | picks one group per media kind |
//! | 3. Insertion | [`insertion`] | re-inserts chosen groups at RTCP anchors |
//! | 4. Section rewriter | [`rewriter`] | m-line ids, `b=` and `a=fmtp` hints |
//! | 5. Profile fixer | [`fixup`] | H.264 profile-level-id repair |
//! | 6. Corruption detector | [`corruption`] | advisory output check |

pub mod classifier;
pub mod corruption;
pub mod dialect;
pub mod fixup;
pub mod insertion;
pub mod rewriter;
pub mod selector;

/// SDP line terminator.
pub const CRLF: &str = "\r\n";

pub const RTCP_MUX: &str = "a=rtcp-mux";
pub const RTCP_RSIZE: &str = "a=rtcp-rsize";

/// Split an SDP blob into its non-empty lines.
///
/// Only CRLF separates lines; a lone `\n` stays part of the line it is in.
pub fn split_lines(sdp: &str) -> Vec<String> {
    sdp.split(CRLF)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join lines back into a blob, terminating every line with CRLF.
pub fn join_lines(lines: &[String]) -> String {
    let mut sdp = String::with_capacity(lines.iter().map(|l| l.len() + CRLF.len()).sum());
    for line in lines {
        sdp.push_str(line);
        sdp.push_str(CRLF);
    }
    sdp
}

/// `a=rtpmap`, `a=rtcp-fb` or `a=fmtp`: the attributes that describe one payload type.
pub fn is_payload_attribute(line: &str) -> bool {
    line.starts_with("a=rtpmap") || line.starts_with("a=rtcp-fb") || line.starts_with("a=fmtp")
}

pub fn is_audio_media_line(line: &str) -> bool {
    line.starts_with("m=audio")
}

pub fn is_video_media_line(line: &str) -> bool {
    line.starts_with("m=video")
}

pub fn is_rtpmap(line: &str) -> bool {
    line.starts_with("a=rtpmap")
}

/// Lines after which bitrate hints are injected.
pub fn is_injection_anchor(line: &str) -> bool {
    line.starts_with("a=mid:") || is_rtpmap(line)
}

/// Congestion-control feedback the legacy VPX decoder cannot negotiate.
pub fn is_congestion_feedback(line: &str) -> bool {
    line.contains("transport-cc") || line.contains("goog-remb") || line.contains("nack")
}
