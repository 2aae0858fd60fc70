//! Triptales turns an ordered set of travel photos and clips into one story video.
//!
//! A run letterboxes every item to the output resolution, grades stills with a named style,
//! captions and fades them, wraps the sequence in title screens and streams the frames into a
//! [`FrameSink`]. Individual unreadable items are skipped; only an empty media list or an output
//! that cannot be written ends a run.
//!
//! - Describe the run with a [`RunConfig`] and a list of [`MediaDescriptor`]s
//! - Call [`render_run`] with any sink, or [`render_to_file`] for ffmpeg output
//! - Or submit background jobs through a [`VideoGenerator`]
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod effects;
pub mod encode;
pub mod jobs;
pub mod render;
pub mod scene;
pub mod session;
pub mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, Resolution};
pub use crate::foundation::error::{TripError, TripResult};

pub use crate::effects::styles::{Style, apply_style};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, OpenSink, SinkConfig};
pub use crate::jobs::generator::{
    FfmpegSinkFactory, GenerationHandle, GenerationRequest, GeneratorSettings, SinkFactory,
    VideoGenerator,
};
pub use crate::jobs::store::{InMemoryJobStore, JobRecord, JobStatus, JobStore};
pub use crate::render::frame::FrameRGB;
pub use crate::render::overlay::{Anchor, OverlayRenderer};
pub use crate::scene::config::{RunConfig, RunManifest};
pub use crate::scene::media::{MediaDescriptor, MediaKind};
pub use crate::session::run::{RunOutcome, render_run, render_to_file};
pub use crate::timeline::assembler::{AssemblyReport, TimelineAssembler};
