use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, OpenSink, SinkConfig};
use crate::foundation::error::{TripError, TripResult};
use crate::scene::config::RunConfig;
use crate::scene::media::MediaDescriptor;
use crate::timeline::assembler::{AssemblyReport, TimelineAssembler};

/// Result of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub success: bool,
    pub output_path: PathBuf,
    pub frames_written: u64,
    /// Items that contributed no frames.
    pub skipped_items: usize,
    pub failure_reason: Option<String>,
}

impl RunOutcome {
    fn failed(cfg: &RunConfig, frames_written: u64, skipped: usize, err: &TripError) -> Self {
        Self {
            success: false,
            output_path: cfg.output_path.clone(),
            frames_written,
            skipped_items: skipped,
            failure_reason: Some(err.to_string()),
        }
    }
}

/// Assemble `media` and write it through `sink`.
///
/// An empty media list or an invalid config is returned as an error before the sink is touched.
/// Once the list is accepted every failure is reported through [`RunOutcome`], and the sink is
/// closed on every path after a successful open.
#[tracing::instrument(
    skip_all,
    fields(items = media.len(), style = %cfg.style_name, output = %cfg.output_path.display())
)]
pub fn render_run(
    cfg: &RunConfig,
    media: &[MediaDescriptor],
    title: Option<&str>,
    sink: &mut dyn FrameSink,
) -> TripResult<RunOutcome> {
    if media.is_empty() {
        return Err(TripError::rejected("no media items to process"));
    }
    cfg.validate()?;

    let assembler = TimelineAssembler::new(cfg);
    let sink_cfg = SinkConfig {
        path: cfg.output_path.clone(),
        codec_id: cfg.codec_id.clone(),
        fps: cfg.fps,
        resolution: cfg.resolution,
    };
    let mut open = match OpenSink::open(sink, sink_cfg) {
        Ok(open) => open,
        Err(e) => {
            tracing::error!(error = %e, "could not open output");
            return Ok(RunOutcome::failed(cfg, 0, 0, &e));
        }
    };

    let mut report = AssemblyReport::default();
    let assembled = assembler.assemble_into(media, title, &mut |f| open.write(&f), &mut report);
    let skipped = report.skipped.len();
    if let Err(e) = assembled {
        let written = open.written();
        drop(open);
        tracing::error!(error = %e, frames = written, skipped, "run aborted");
        return Ok(RunOutcome::failed(cfg, written, skipped, &e));
    }

    let written = match open.close() {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(error = %e, "closing output failed");
            return Ok(RunOutcome::failed(cfg, report.frames, skipped, &e));
        }
    };

    tracing::info!(
        frames = written,
        intro = report.intro_frames,
        outro = report.outro_frames,
        skipped,
        "run completed"
    );
    Ok(RunOutcome {
        success: true,
        output_path: cfg.output_path.clone(),
        frames_written: written,
        skipped_items: skipped,
        failure_reason: None,
    })
}

/// [`render_run`] into `cfg.output_path` through the system `ffmpeg`.
pub fn render_to_file(
    cfg: &RunConfig,
    media: &[MediaDescriptor],
    title: Option<&str>,
) -> TripResult<RunOutcome> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        overwrite: cfg.overwrite,
    });
    render_run(cfg, media, title, &mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/session/run.rs"]
mod tests;
