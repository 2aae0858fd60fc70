use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{TripError, TripResult};
use crate::render::overlay::Anchor;
use crate::scene::media::MediaDescriptor;

pub const DEFAULT_OUTRO_TEXT: &str = "Thank you for watching!";

/// Parameters of one run. Immutable for the run's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub output_path: PathBuf,
    pub fps: Fps,
    pub resolution: Resolution,
    /// FourCC-style codec id, e.g. `mp4v` or `avc1`.
    pub codec_id: String,
    /// Style name; unknown names render without grading.
    pub style_name: String,
    pub photo_duration_seconds: u32,
    /// Fade ramp for still images, in frames. Zero disables fades.
    pub transition_frame_count: u64,
    pub max_clip_duration_seconds: u32,
    pub add_intro: bool,
    pub add_outro: bool,
    pub intro_duration_seconds: u32,
    pub outro_duration_seconds: u32,
    pub outro_text: String,
    pub title_fade_frames: u64,
    pub caption_anchor: Anchor,
    /// Extra fonts loaded on top of the system fonts.
    pub font_dir: Option<PathBuf>,
    /// Replace an existing output file instead of failing to open the writer.
    pub overwrite: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output.mp4"),
            fps: Fps::default(),
            resolution: Resolution::default(),
            codec_id: "mp4v".to_string(),
            style_name: "cinematic".to_string(),
            photo_duration_seconds: 1,
            transition_frame_count: 15,
            max_clip_duration_seconds: 5,
            add_intro: true,
            add_outro: true,
            intro_duration_seconds: 3,
            outro_duration_seconds: 2,
            outro_text: DEFAULT_OUTRO_TEXT.to_string(),
            title_fade_frames: 15,
            caption_anchor: Anchor::Bottom,
            font_dir: None,
            overwrite: true,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> TripResult<()> {
        if self.fps.get() == 0 {
            return Err(TripError::validation("fps must be > 0"));
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(TripError::validation("resolution width/height must be > 0"));
        }
        if self.codec_id.trim().is_empty() {
            return Err(TripError::validation("codec id must not be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(TripError::validation("output path must not be empty"));
        }
        Ok(())
    }

    /// Frames contributed by one still image.
    pub fn frames_per_photo(&self) -> u64 {
        self.fps.frames_for_secs(self.photo_duration_seconds)
    }

    /// Upper bound on frames decoded from one clip.
    pub fn max_clip_frames(&self) -> u64 {
        self.fps.frames_for_secs(self.max_clip_duration_seconds)
    }
}

/// A run described as a JSON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    #[serde(default)]
    pub config: RunConfig,
    #[serde(default)]
    pub title: Option<String>,
    pub media: Vec<MediaDescriptor>,
}

impl RunManifest {
    pub fn from_json_str(s: &str) -> TripResult<Self> {
        serde_json::from_str(s).map_err(|e| TripError::serde(format!("run manifest: {e}")))
    }

    /// Load a manifest. Relative media paths resolve against the manifest's directory.
    pub fn from_json_file(path: &Path) -> TripResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read run manifest '{}'", path.display()))?;
        let mut manifest = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            for item in &mut manifest.media {
                if item.path.is_relative() {
                    item.path = base.join(&item.path);
                }
            }
        }
        Ok(manifest)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
