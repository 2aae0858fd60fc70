use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What kind of source a media item is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Clip,
}

const CLIP_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "webm", "mpg", "mpeg"];

impl MediaKind {
    /// Classify an uploaded file by MIME type. Anything other than `image/*` or `video/*` has
    /// no kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.trim().split('/').next()?.to_ascii_lowercase();
        match top.as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Clip),
            _ => None,
        }
    }

    /// Classify a file by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        if image::ImageFormat::from_path(path).is_ok() {
            return Some(Self::Image);
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        CLIP_EXTENSIONS
            .contains(&ext.as_str())
            .then_some(Self::Clip)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Clip => "clip",
        })
    }
}

/// One input item of a run. The pipeline only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Sort key for the timeline; defaults to the file name.
    pub display_name: String,
}

impl MediaDescriptor {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            display_name: display_name.into(),
        }
    }

    /// Descriptor for `path` with the kind guessed from its extension and the file name as the
    /// display name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = MediaKind::from_path(&path)?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Some(Self {
            path,
            kind,
            display_name,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/media.rs"]
mod tests;
