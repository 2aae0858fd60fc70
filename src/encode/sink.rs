use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{TripError, TripResult};
use crate::render::frame::FrameRGB;

/// Parameters for opening a [`FrameSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output container path.
    pub path: PathBuf,
    /// FourCC-style codec id.
    pub codec_id: String,
    pub fps: Fps,
    /// Every pushed frame has exactly this size.
    pub resolution: Resolution,
}

/// Sink contract for consuming composited frames in timeline order.
///
/// `begin` opens the container and fails with [`TripError::WriterOpen`] when it cannot.
/// `push_frame` is called in strictly increasing `FrameIndex` order. `end` flushes and releases
/// the container; callers go through [`OpenSink`] so it runs exactly once per successful `begin`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> TripResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> TripResult<()>;
    fn end(&mut self) -> TripResult<()>;
}

/// Scoped handle to an opened sink. Dropping it without [`OpenSink::close`] still ends the sink.
pub struct OpenSink<'a> {
    sink: &'a mut dyn FrameSink,
    resolution: Resolution,
    written: u64,
    closed: bool,
}

impl<'a> OpenSink<'a> {
    pub fn open(sink: &'a mut dyn FrameSink, cfg: SinkConfig) -> TripResult<Self> {
        let resolution = cfg.resolution;
        sink.begin(cfg)?;
        Ok(Self {
            sink,
            resolution,
            written: 0,
            closed: false,
        })
    }

    pub fn write(&mut self, frame: &FrameRGB) -> TripResult<()> {
        if frame.resolution() != self.resolution {
            return Err(TripError::encode(format!(
                "frame size mismatch: got {}, expected {}",
                frame.resolution(),
                self.resolution
            )));
        }
        self.sink.push_frame(FrameIndex(self.written), frame)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// End the sink and return the number of frames written.
    pub fn close(mut self) -> TripResult<u64> {
        self.closed = true;
        self.sink.end()?;
        Ok(self.written)
    }
}

impl Drop for OpenSink<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.sink.end() {
            tracing::warn!(error = %e, frames = self.written, "closing sink after failed run");
        }
    }
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    retain: bool,
    frames: Vec<(FrameIndex, FrameRGB)>,
    pushed: u64,
    begins: u32,
    ends: u32,
}

impl InMemorySink {
    /// A sink that keeps every pushed frame.
    pub fn new() -> Self {
        Self {
            retain: true,
            ..Self::default()
        }
    }

    /// A sink that only counts frames.
    pub fn counting() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in timeline order. Empty for counting sinks.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGB)] {
        &self.frames
    }

    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    pub fn begin_calls(&self) -> u32 {
        self.begins
    }

    pub fn end_calls(&self) -> u32 {
        self.ends
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TripResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.pushed = 0;
        self.begins += 1;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> TripResult<()> {
        if self.cfg.is_none() {
            return Err(TripError::encode("in-memory sink not started"));
        }
        if self.retain {
            self.frames.push((idx, frame.clone()));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> TripResult<()> {
        self.ends += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
