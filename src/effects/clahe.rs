//! Contrast-limited adaptive histogram equalization on a single 8-bit channel.

use rayon::prelude::*;

use crate::foundation::math::saturate_u8;

const BINS: usize = 256;

/// Tile grid and clip limit for [`equalize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClaheParams {
    /// Histogram clip limit, relative to a uniform histogram.
    pub(crate) clip_limit: f32,
    /// Tiles along x.
    pub(crate) tiles_x: u32,
    /// Tiles along y.
    pub(crate) tiles_y: u32,
}

impl ClaheParams {
    pub(crate) fn new(clip_limit: f32) -> Self {
        Self {
            clip_limit,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

/// Equalize `src` (`width * height` samples) tile by tile, blending neighbouring tile mappings
/// bilinearly so tile seams do not show.
pub(crate) fn equalize(src: &[u8], width: u32, height: u32, params: ClaheParams) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || src.len() != w * h {
        return src.to_vec();
    }

    let gx = (params.tiles_x.max(1) as usize).min(w);
    let gy = (params.tiles_y.max(1) as usize).min(h);
    let x_bounds: Vec<usize> = (0..=gx).map(|i| i * w / gx).collect();
    let y_bounds: Vec<usize> = (0..=gy).map(|i| i * h / gy).collect();

    let luts: Vec<[u8; BINS]> = (0..gy * gx)
        .into_par_iter()
        .map(|t| {
            let (ty, tx) = (t / gx, t % gx);
            tile_lut(
                src,
                w,
                (x_bounds[tx], x_bounds[tx + 1]),
                (y_bounds[ty], y_bounds[ty + 1]),
                params.clip_limit,
            )
        })
        .collect();

    let tile_w = w as f32 / gx as f32;
    let tile_h = h as f32 / gy as f32;

    let mut out = vec![0u8; w * h];
    out.par_chunks_exact_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let (ty1, ty2, ya) = neighbours(y, tile_h, gy);
            for (x, o) in row.iter_mut().enumerate() {
                let (tx1, tx2, xa) = neighbours(x, tile_w, gx);
                let v = src[y * w + x] as usize;
                let top = f32::from(luts[ty1 * gx + tx1][v]) * (1.0 - xa)
                    + f32::from(luts[ty1 * gx + tx2][v]) * xa;
                let bottom = f32::from(luts[ty2 * gx + tx1][v]) * (1.0 - xa)
                    + f32::from(luts[ty2 * gx + tx2][v]) * xa;
                *o = saturate_u8(top * (1.0 - ya) + bottom * ya);
            }
        });
    out
}

/// The two tile indices whose centres bracket sample `i`, and the weight of the second one.
fn neighbours(i: usize, tile: f32, count: usize) -> (usize, usize, f32) {
    let pos = (i as f32 + 0.5) / tile - 0.5;
    let lo = pos.floor();
    let weight = pos - lo;
    let last = (count - 1) as f32;
    let t1 = lo.clamp(0.0, last) as usize;
    let t2 = (lo + 1.0).clamp(0.0, last) as usize;
    (t1, t2, weight)
}

fn tile_lut(
    src: &[u8],
    stride: usize,
    (x0, x1): (usize, usize),
    (y0, y1): (usize, usize),
    clip_limit: f32,
) -> [u8; BINS] {
    let mut hist = [0u32; BINS];
    for y in y0..y1 {
        for &v in &src[y * stride + x0..y * stride + x1] {
            hist[v as usize] += 1;
        }
    }
    let area = ((x1 - x0) * (y1 - y0)) as u32;
    let mut lut = [0u8; BINS];
    if area == 0 {
        for (i, l) in lut.iter_mut().enumerate() {
            *l = i as u8;
        }
        return lut;
    }

    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);
        let mut clipped = 0u32;
        for bin in hist.iter_mut() {
            if *bin > limit {
                clipped += *bin - limit;
                *bin = limit;
            }
        }

        let redist = clipped / BINS as u32;
        let mut residual = clipped - redist * BINS as u32;
        for bin in hist.iter_mut() {
            *bin += redist;
        }
        if residual > 0 {
            let step = (BINS as u32 / residual).max(1) as usize;
            let mut i = 0;
            while i < BINS && residual > 0 {
                hist[i] += 1;
                residual -= 1;
                i += step;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut sum = 0u32;
    for (l, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *l = saturate_u8(sum as f32 * scale);
    }
    lut
}
