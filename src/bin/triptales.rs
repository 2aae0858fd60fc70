use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use triptales::{
    Anchor, Fps, MediaDescriptor, OverlayRenderer, Resolution, RunConfig, RunManifest, Style,
};

#[derive(Parser, Debug)]
#[command(name = "triptales", version, about = "Compose travel photos and clips into a video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a story video (requires `ffmpeg` on PATH).
    ///
    /// Video clips are decoded only in builds with the `media-ffmpeg` feature; other builds
    /// skip every clip with a warning and render the photos.
    Render(RenderArgs),
    /// Render one graded, captioned still as a PNG preview.
    Still(StillArgs),
    /// List accepted style names.
    Styles,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Photos and clips. Kinds are guessed from file extensions. Clips need the
    /// `media-ffmpeg` build feature.
    media: Vec<PathBuf>,

    /// Run manifest JSON. Media given on the command line are appended to it.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Output container path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Intro title; no intro is rendered without one.
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    /// Output size as WIDTHxHEIGHT.
    #[arg(long)]
    resolution: Option<Resolution>,

    /// FourCC-style codec id (mp4v, avc1, mjpg, hevc, vp09).
    #[arg(long)]
    codec: Option<String>,

    /// Seconds each photo stays on screen.
    #[arg(long)]
    photo_duration: Option<u32>,

    /// Fade length in frames at each end of a photo.
    #[arg(long)]
    transition: Option<u64>,

    /// Maximum seconds taken from each clip.
    #[arg(long)]
    max_clip: Option<u32>,

    #[arg(long)]
    no_intro: bool,

    #[arg(long)]
    no_outro: bool,

    #[arg(long)]
    outro_text: Option<String>,

    /// Caption position: top, bottom or center.
    #[arg(long)]
    caption: Option<Anchor>,

    /// Extra font directory.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct StillArgs {
    /// Source image.
    input: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "cinematic")]
    style: String,

    #[arg(long, default_value = "1920x1080")]
    resolution: Resolution,

    /// Caption text.
    #[arg(long)]
    caption: Option<String>,

    #[arg(long, default_value = "bottom")]
    anchor: Anchor,

    #[arg(long)]
    font_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Still(args) => cmd_still(args),
        Command::Styles => {
            cmd_styles();
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut manifest = match &args.manifest {
        Some(path) => RunManifest::from_json_file(path)
            .with_context(|| format!("load manifest '{}'", path.display()))?,
        None => RunManifest::default(),
    };

    for path in &args.media {
        match MediaDescriptor::from_path(path) {
            Some(item) => manifest.media.push(item),
            None => tracing::warn!(path = %path.display(), "unrecognized media type, skipping"),
        }
    }
    if args.title.is_some() {
        manifest.title = args.title.clone();
    }
    apply_overrides(&mut manifest.config, &args)?;

    let outcome = triptales::render_to_file(
        &manifest.config,
        &manifest.media,
        manifest.title.as_deref(),
    )?;
    if !outcome.success {
        anyhow::bail!(
            "render failed: {}",
            outcome.failure_reason.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "wrote {} frames to {} ({} items skipped)",
        outcome.frames_written,
        outcome.output_path.display(),
        outcome.skipped_items
    );
    Ok(())
}

fn apply_overrides(cfg: &mut RunConfig, args: &RenderArgs) -> anyhow::Result<()> {
    if let Some(out) = &args.out {
        cfg.output_path = out.clone();
    }
    if let Some(style) = &args.style {
        cfg.style_name = style.clone();
    }
    if let Some(fps) = args.fps {
        cfg.fps = Fps::new(fps)?;
    }
    if let Some(res) = args.resolution {
        cfg.resolution = res;
    }
    if let Some(codec) = &args.codec {
        cfg.codec_id = codec.clone();
    }
    if let Some(secs) = args.photo_duration {
        cfg.photo_duration_seconds = secs;
    }
    if let Some(frames) = args.transition {
        cfg.transition_frame_count = frames;
    }
    if let Some(secs) = args.max_clip {
        cfg.max_clip_duration_seconds = secs;
    }
    if args.no_intro {
        cfg.add_intro = false;
    }
    if args.no_outro {
        cfg.add_outro = false;
    }
    if let Some(text) = &args.outro_text {
        cfg.outro_text = text.clone();
    }
    if let Some(anchor) = args.caption {
        cfg.caption_anchor = anchor;
    }
    if let Some(dir) = &args.font_dir {
        cfg.font_dir = Some(dir.clone());
    }
    if args.no_overwrite {
        cfg.overwrite = false;
    }
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let src = triptales::assets::decode::decode_image(&args.input)?;
    let frame = triptales::render::letterbox::normalize(&src, args.resolution);
    let mut frame = Style::resolve(&args.style).apply(&frame);
    if let Some(text) = &args.caption {
        let overlay = OverlayRenderer::new(args.resolution, args.font_dir.as_deref());
        overlay.draw_caption_in_place(&mut frame, text, args.anchor)?;
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    frame
        .into_image()
        .save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_styles() {
    for (name, style) in Style::NAMES {
        if *name == style.as_str() {
            println!("{name}");
        } else {
            println!("{name} (alias of {style})");
        }
    }
    println!("any other name renders without grading");
}
