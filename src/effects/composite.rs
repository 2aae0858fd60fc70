use rayon::prelude::*;

use crate::foundation::error::{TripError, TripResult};
use crate::foundation::math::{mul_div255_u8, saturate_u8};
use crate::render::frame::FrameRGB;

/// Blend `frame` toward black: `out = frame * weight + black * (1 - weight)`.
pub fn blend_toward_black(frame: &FrameRGB, weight: f32) -> FrameRGB {
    let mut out = frame.clone();
    blend_toward_black_in_place(&mut out, weight);
    out
}

/// In-place variant of [`blend_toward_black`].
pub fn blend_toward_black_in_place(frame: &mut FrameRGB, weight: f32) {
    let weight = weight.clamp(0.0, 1.0);
    if weight >= 1.0 {
        return;
    }
    frame
        .data
        .par_iter_mut()
        .for_each(|c| *c = saturate_u8(f32::from(*c) * weight));
}

/// Axis-aligned pixel rectangle, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge, may be negative before clipping.
    pub x0: i64,
    /// Top edge, may be negative before clipping.
    pub y0: i64,
    /// Right edge (exclusive).
    pub x1: i64,
    /// Bottom edge (exclusive).
    pub y1: i64,
}

impl PixelRect {
    /// Clip to `[0, width) x [0, height)`; `None` when nothing remains.
    pub fn clip(self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x0.clamp(0, i64::from(width));
        let y0 = self.y0.clamp(0, i64::from(height));
        let x1 = self.x1.clamp(0, i64::from(width));
        let y1 = self.y1.clamp(0, i64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Composite a solid color with `opacity` over the pixels inside `rect`.
pub fn fill_rect_over(frame: &mut FrameRGB, rect: PixelRect, color: [u8; 3], opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    let Some((x0, y0, x1, y1)) = rect.clip(frame.width, frame.height) else {
        return;
    };
    if opacity <= 0.0 {
        return;
    }
    let keep = 1.0 - opacity;
    for y in y0..y1 {
        let row = frame.row_mut(y);
        for px in row[(x0 as usize) * 3..(x1 as usize) * 3].chunks_exact_mut(3) {
            for (c, &s) in px.iter_mut().zip(color.iter()) {
                *c = saturate_u8(f32::from(*c) * keep + f32::from(s) * opacity);
            }
        }
    }
}

/// Composite a premultiplied RGBA8 layer (same size as `frame`) over it.
pub fn over_premul_in_place(frame: &mut FrameRGB, layer_premul: &[u8]) -> TripResult<()> {
    if layer_premul.len() != frame.data.len() / 3 * 4 {
        return Err(TripError::validation(
            "over_premul_in_place expects an rgba8 layer matching the frame size",
        ));
    }
    frame
        .data
        .par_chunks_exact_mut(3)
        .zip(layer_premul.par_chunks_exact(4))
        .for_each(|(d, s)| {
            let a = u16::from(s[3]);
            if a == 0 {
                return;
            }
            let inv = 255 - a;
            for i in 0..3 {
                let dc = mul_div255_u8(u16::from(d[i]), inv);
                d[i] = s[i].saturating_add(dc);
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
