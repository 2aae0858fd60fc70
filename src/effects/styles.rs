//! Named color-grading styles.
//!
//! Style names resolve case-insensitively through a fixed alias table. Names that do not
//! resolve map to [`Style::Passthrough`], which returns frames unchanged.

use rayon::prelude::*;

use crate::effects::clahe::{ClaheParams, equalize};
use crate::effects::color::{hsv_to_rgb, lab8_to_rgb, luma, rgb_to_hsv, rgb_to_lab8};
use crate::foundation::math::{hash_xy, saturate_u8};
use crate::render::frame::FrameRGB;

const GRAIN_SIGMA: f32 = 15.0;
const GRAIN_SEED: u64 = 0x7472_6970_7461_6c65;

/// A color-grading transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Local contrast on luminance, teal/orange chroma shift, light vignette.
    Cinematic,
    /// Sepia, film grain, desaturation, stronger vignette.
    Vintage,
    /// Boosted saturation and brightness.
    Vibrant,
    /// High-contrast monochrome with vignette.
    BlackAndWhite,
    /// Identity.
    Passthrough,
}

impl Style {
    /// Accepted names and the style each resolves to, aliases included.
    pub const NAMES: &'static [(&'static str, Style)] = &[
        ("cinematic", Style::Cinematic),
        ("vintage", Style::Vintage),
        ("vibrant", Style::Vibrant),
        ("black_and_white", Style::BlackAndWhite),
        ("memory_lane", Style::Vintage),
        ("instagram", Style::Vibrant),
    ];

    /// Resolve a style name. Never fails: unknown names give [`Style::Passthrough`].
    pub fn resolve(name: &str) -> Self {
        let lower = name.to_lowercase();
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, s)| *s)
            .unwrap_or(Style::Passthrough)
    }

    /// Canonical name of the style.
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Cinematic => "cinematic",
            Style::Vintage => "vintage",
            Style::Vibrant => "vibrant",
            Style::BlackAndWhite => "black_and_white",
            Style::Passthrough => "none",
        }
    }

    /// Apply the style to `frame`, returning a new frame of the same size.
    pub fn apply(self, frame: &FrameRGB) -> FrameRGB {
        match self {
            Style::Cinematic => cinematic(frame),
            Style::Vintage => vintage(frame),
            Style::Vibrant => vibrant(frame),
            Style::BlackAndWhite => black_and_white(frame),
            Style::Passthrough => frame.clone(),
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve `style_name` and apply it.
pub fn apply_style(frame: &FrameRGB, style_name: &str) -> FrameRGB {
    Style::resolve(style_name).apply(frame)
}

fn cinematic(frame: &FrameRGB) -> FrameRGB {
    let lab: Vec<[u8; 3]> = frame
        .data
        .par_chunks_exact(3)
        .map(|px| rgb_to_lab8([px[0], px[1], px[2]]))
        .collect();
    let l: Vec<u8> = lab.iter().map(|px| px[0]).collect();
    let l = equalize(&l, frame.width, frame.height, ClaheParams::new(3.0));

    let mut out = frame.clone();
    out.data
        .par_chunks_exact_mut(3)
        .zip(lab.par_iter().zip(l.par_iter()))
        .for_each(|(dst, (px, &l))| {
            // +a pushes toward orange, -b toward teal.
            let a = px[1].saturating_add(10);
            let b = px[2].saturating_sub(10);
            dst.copy_from_slice(&lab8_to_rgb([l, a, b]));
        });
    vignette_in_place(&mut out, 0.3);
    out
}

fn vintage(frame: &FrameRGB) -> FrameRGB {
    let mut out = frame.clone();
    let w = frame.width as usize;
    out.data
        .par_chunks_exact_mut(w * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let [r, g, b] = sepia([px[0], px[1], px[2]]);
                let grained = [
                    add_grain(r, x as u32, y as u32, 0),
                    add_grain(g, x as u32, y as u32, 1),
                    add_grain(b, x as u32, y as u32, 2),
                ];
                let [h, s, v] = rgb_to_hsv(grained);
                px.copy_from_slice(&hsv_to_rgb([h, s * 0.6, v]));
            }
        });
    vignette_in_place(&mut out, 0.4);
    out
}

fn vibrant(frame: &FrameRGB) -> FrameRGB {
    let mut out = frame.clone();
    out.data.par_chunks_exact_mut(3).for_each(|px| {
        let [h, s, v] = rgb_to_hsv([px[0], px[1], px[2]]);
        px.copy_from_slice(&hsv_to_rgb([h, (s * 1.5).min(1.0), (v * 1.1).min(255.0)]));
    });
    out
}

fn black_and_white(frame: &FrameRGB) -> FrameRGB {
    let gray: Vec<u8> = frame
        .data
        .par_chunks_exact(3)
        .map(|px| luma([px[0], px[1], px[2]]))
        .collect();
    let gray = equalize(&gray, frame.width, frame.height, ClaheParams::new(4.0));

    let mut out = frame.clone();
    out.data
        .par_chunks_exact_mut(3)
        .zip(gray.par_iter())
        .for_each(|(dst, &g)| dst.copy_from_slice(&[g, g, g]));
    vignette_in_place(&mut out, 0.3);
    out
}

fn sepia([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    [
        saturate_u8(0.393 * r + 0.769 * g + 0.189 * b),
        saturate_u8(0.349 * r + 0.686 * g + 0.168 * b),
        saturate_u8(0.272 * r + 0.534 * g + 0.131 * b),
    ]
}

/// Add zero-mean Gaussian grain (Box-Muller over a per-pixel hash).
fn add_grain(v: u8, x: u32, y: u32, channel: u8) -> u8 {
    let h = hash_xy(GRAIN_SEED, x, y, channel);
    let u1 = ((h >> 40) as f32 + 1.0) / ((1u64 << 24) as f32 + 1.0);
    let u2 = ((h >> 8) & 0xFF_FFFF) as f32 / (1u64 << 24) as f32;
    let n = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
    saturate_u8(f32::from(v) + n * GRAIN_SIGMA)
}

/// Radial darkening: `mask = 1 - clamp(radius * intensity, 0, 1)` over normalized coordinates
/// in `[-1, 1] x [-1, 1]`, multiplied into every channel.
pub fn vignette_in_place(frame: &mut FrameRGB, intensity: f32) {
    let (w, h) = (frame.width as usize, frame.height as usize);
    if w == 0 || h == 0 {
        return;
    }
    let xs: Vec<f32> = linspace(w).map(|x| x * x).collect();
    let ys: Vec<f32> = linspace(h).map(|y| y * y).collect();

    frame
        .data
        .par_chunks_exact_mut(w * 3)
        .zip(ys.par_iter())
        .for_each(|(row, &yy)| {
            for (px, &xx) in row.chunks_exact_mut(3).zip(xs.iter()) {
                let mask = 1.0 - ((xx + yy).sqrt() * intensity).clamp(0.0, 1.0);
                for c in px.iter_mut() {
                    *c = (f32::from(*c) * mask) as u8;
                }
            }
        });
}

/// `n` evenly spaced samples over `[-1, 1]`; a single sample is `-1`.
fn linspace(n: usize) -> impl Iterator<Item = f32> {
    let step = if n > 1 { 2.0 / (n - 1) as f32 } else { 0.0 };
    (0..n).map(move |i| -1.0 + step * i as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/styles.rs"]
mod tests;
