use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{TripError, TripResult};

/// Decode the still image at `path` into RGB8.
///
/// Any read or decode failure is reported as [`TripError::Media`] so callers can skip the item.
pub fn decode_image(path: &Path) -> TripResult<image::RgbImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(|e| TripError::media(format!("{e:#}")))?;
    decode_image_bytes(&bytes)
        .map_err(|e| TripError::media(format!("'{}': {e}", path.display())))
}

pub fn decode_image_bytes(bytes: &[u8]) -> TripResult<image::RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = dyn_img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(TripError::media("decoded image has zero size"));
    }
    Ok(rgb)
}
