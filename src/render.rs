//! Raster stages: the canonical frame buffer, letterboxing and text overlays.

pub mod frame;
pub mod letterbox;
pub mod overlay;
pub(crate) mod text;
