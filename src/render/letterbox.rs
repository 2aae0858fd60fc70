use image::imageops::FilterType;

use crate::foundation::core::Resolution;
use crate::render::frame::FrameRGB;

/// Placement of a letterboxed source inside the canonical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterboxFit {
    /// Scaled source width.
    pub width: u32,
    /// Scaled source height.
    pub height: u32,
    /// Left padding.
    pub x_offset: u32,
    /// Top padding.
    pub y_offset: u32,
}

/// Compute the aspect-preserving fit of a `src_w x src_h` raster into `target`.
///
/// A source wider than the target is scaled to the full target width; otherwise it is scaled to
/// the full target height. Scaled sizes are truncated and never drop below one pixel.
pub fn fit(src_w: u32, src_h: u32, target: Resolution) -> LetterboxFit {
    let target_aspect = target.aspect();
    let source_aspect = f64::from(src_w.max(1)) / f64::from(src_h.max(1));

    let (w, h) = if source_aspect > target_aspect {
        let h = (f64::from(target.width) / source_aspect) as u32;
        (target.width, h)
    } else {
        let w = (f64::from(target.height) * source_aspect) as u32;
        (w, target.height)
    };
    let w = w.clamp(1, target.width);
    let h = h.clamp(1, target.height);

    LetterboxFit {
        width: w,
        height: h,
        x_offset: (target.width - w) / 2,
        y_offset: (target.height - h) / 2,
    }
}

/// Resize `src` to fit `target` and centre it on a black canvas.
///
/// The output always has exactly `target` dimensions.
pub fn normalize(src: &image::RgbImage, target: Resolution) -> FrameRGB {
    let (sw, sh) = src.dimensions();
    if (sw, sh) == (target.width, target.height) {
        return FrameRGB::from_image(src.clone());
    }
    let mut out = FrameRGB::black(target);
    if sw == 0 || sh == 0 {
        return out;
    }

    let fit = fit(sw, sh, target);
    let resized;
    let scaled = if (sw, sh) == (fit.width, fit.height) {
        src
    } else {
        resized = image::imageops::resize(src, fit.width, fit.height, FilterType::Lanczos3);
        &resized
    };

    let row_bytes = fit.width as usize * 3;
    let src_raw = scaled.as_raw();
    for y in 0..fit.height {
        let s = y as usize * row_bytes;
        let dst_row = out.row_mut(y + fit.y_offset);
        let d = fit.x_offset as usize * 3;
        dst_row[d..d + row_bytes].copy_from_slice(&src_raw[s..s + row_bytes]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/letterbox.rs"]
mod tests;
