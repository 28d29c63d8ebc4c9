use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sdp_enhance::{EnhanceMode, OfferOutcome, Profile, PublisherConfig, is_corrupted, prepare_offer};

#[derive(Parser)]
#[command(
    name = "sdp-enhance",
    about = "Rewrite a browser SDP offer toward a preferred codec and bitrate"
)]
struct Args {
    /// SDP offer to read (`-` or omitted for stdin)
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Video codec profile: VPX, 42e01f, or a codec name such as VP9 or H264
    #[arg(long, default_value = "42e01f")]
    video_profile: Profile,

    /// Audio codec profile, e.g. opus
    #[arg(long, default_value = "opus")]
    audio_profile: Profile,

    /// Video bitrate in kbps
    #[arg(long)]
    video_bitrate: Option<u32>,

    /// Audio bitrate in kbps
    #[arg(long)]
    audio_bitrate: Option<u32>,

    /// Video frame rate (only emitted with --video-bitrate)
    #[arg(long)]
    frame_rate: Option<f64>,

    /// auto (revert on corruption or unmatched codec), always, or off
    #[arg(long, default_value = "auto")]
    mode: EnhanceMode,

    /// Only run the corruption check on the input (exit 2 if corrupted)
    #[arg(long)]
    check: bool,
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Offers saved from a browser console often lose their CR.
fn normalize_line_endings(sdp: String) -> String {
    if sdp.contains("\r\n") {
        sdp
    } else {
        sdp.replace('\n', "\r\n")
    }
}

fn run(args: Args) -> sdp_enhance::Result<ExitCode> {
    let sdp = normalize_line_endings(read_input(args.input.as_ref())?);

    if args.check {
        if is_corrupted(&sdp) {
            println!("corrupted");
            return Ok(ExitCode::from(2));
        }
        println!("ok");
        return Ok(ExitCode::SUCCESS);
    }

    let config = PublisherConfig {
        video_profile: args.video_profile,
        audio_profile: args.audio_profile,
        video_bitrate: args.video_bitrate,
        audio_bitrate: args.audio_bitrate,
        video_frame_rate: args.frame_rate,
        enhance_mode: args.mode,
    };

    let prepared = prepare_offer(&sdp, &config);
    if prepared.outcome == OfferOutcome::Reverted {
        tracing::warn!("rewrite discarded, emitting original offer");
    }

    match &args.output {
        Some(path) => fs::write(path, &prepared.sdp)?,
        None => io::stdout().write_all(prepared.sdp.as_bytes())?,
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sdp-enhance: {}", e);
            ExitCode::FAILURE
        }
    }
}
