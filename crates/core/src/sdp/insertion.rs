//! Stage 3: put the selected payload groups back at RTCP anchor lines.
//!
//! The audio group goes after the first `a=rtcp-mux`. The video group goes
//! after the first `a=rtcp-rsize` when the offer has one, otherwise after
//! the first `a=rtcp-mux`. Only the first anchor counts; a missing anchor
//! drops the group.

use super::classifier::PayloadGroup;
use super::{RTCP_MUX, RTCP_RSIZE};

/// Insert `block` after the first line exactly equal to `anchor`.
fn insert_after_first(lines: Vec<String>, anchor: &str, block: &PayloadGroup) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + block.lines.len());
    let mut done = false;

    for line in lines.into_iter().filter(|line| !line.is_empty()) {
        let hit = !done && line == anchor;
        out.push(line);
        if hit {
            out.extend(block.lines.iter().cloned());
            done = true;
        }
    }

    if !done {
        tracing::warn!(anchor, payload_type = block.id, "insertion anchor missing, dropping payload group");
    }
    out
}

/// Insert the audio group after the first `a=rtcp-mux`.
pub fn insert_audio(lines: Vec<String>, block: Option<&PayloadGroup>) -> Vec<String> {
    match block {
        Some(block) => insert_after_first(lines, RTCP_MUX, block),
        None => lines,
    }
}

/// Insert the video group after the first `a=rtcp-rsize`, or the first `a=rtcp-mux` without one.
pub fn insert_video(lines: Vec<String>, block: Option<&PayloadGroup>) -> Vec<String> {
    let Some(block) = block else {
        return lines;
    };

    let has_rsize = lines.iter().any(|line| line.contains(RTCP_RSIZE));
    let anchor = if has_rsize { RTCP_RSIZE } else { RTCP_MUX };
    insert_after_first(lines, anchor, block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    fn group(id: u32, raw: &[&str]) -> PayloadGroup {
        PayloadGroup {
            id,
            lines: lines(raw),
        }
    }

    #[test]
    fn audio_goes_after_first_mux_only() {
        let opus = group(111, &["a=rtpmap:111 opus/48000/2"]);
        let out = insert_audio(
            lines(&["m=audio 9 RTP/SAVPF 111", "a=rtcp-mux", "m=video 9 RTP/SAVPF 96", "a=rtcp-mux"]),
            Some(&opus),
        );
        assert_eq!(
            out,
            lines(&[
                "m=audio 9 RTP/SAVPF 111",
                "a=rtcp-mux",
                "a=rtpmap:111 opus/48000/2",
                "m=video 9 RTP/SAVPF 96",
                "a=rtcp-mux",
            ])
        );
    }

    #[test]
    fn audio_without_mux_is_dropped() {
        let opus = group(111, &["a=rtpmap:111 opus/48000/2"]);
        let input = lines(&["m=audio 9 RTP/SAVPF 111", "a=mid:0"]);
        assert_eq!(insert_audio(input.clone(), Some(&opus)), input);
    }

    #[test]
    fn video_prefers_rsize() {
        let vp8 = group(96, &["a=rtpmap:96 VP8/90000", "a=rtcp-fb:96 ccm fir"]);
        let out = insert_video(
            lines(&["a=rtcp-mux", "m=video 9 RTP/SAVPF 96", "a=rtcp-mux", "a=rtcp-rsize", "a=rtcp-rsize"]),
            Some(&vp8),
        );
        assert_eq!(
            out,
            lines(&[
                "a=rtcp-mux",
                "m=video 9 RTP/SAVPF 96",
                "a=rtcp-mux",
                "a=rtcp-rsize",
                "a=rtpmap:96 VP8/90000",
                "a=rtcp-fb:96 ccm fir",
                "a=rtcp-rsize",
            ])
        );
    }

    #[test]
    fn video_falls_back_to_mux() {
        let vp8 = group(96, &["a=rtpmap:96 VP8/90000"]);
        let out = insert_video(lines(&["m=video 9 RTP/SAVPF 96", "a=rtcp-mux", "a=rtcp-mux"]), Some(&vp8));
        assert_eq!(
            out,
            lines(&["m=video 9 RTP/SAVPF 96", "a=rtcp-mux", "a=rtpmap:96 VP8/90000", "a=rtcp-mux"])
        );
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let input = lines(&["a=rtcp-mux", "a=rtcp-rsize"]);
        assert_eq!(insert_audio(input.clone(), None), input);
        assert_eq!(insert_video(input.clone(), None), input);
    }

    #[test]
    fn empty_lines_are_dropped() {
        let opus = group(111, &["a=rtpmap:111 opus/48000/2"]);
        let out = insert_audio(lines(&["", "a=rtcp-mux", ""]), Some(&opus));
        assert_eq!(out, lines(&["a=rtcp-mux", "a=rtpmap:111 opus/48000/2"]));
    }
}
