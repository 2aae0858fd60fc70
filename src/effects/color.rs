//! 8-bit color space conversions.
//!
//! Lab follows the usual 8-bit packing (`L * 255 / 100`, `a + 128`, `b + 128`) over sRGB with a
//! D65 white point. HSV is kept in floating point: hue in degrees, saturation in `[0, 1]`, value in
//! `[0, 255]`.

use crate::foundation::math::saturate_u8;

const XN: f32 = 0.950_456;
const ZN: f32 = 1.088_754;
const EPS: f32 = 0.008_856;
const KAPPA: f32 = 903.3;

fn srgb_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    saturate_u8(v * 255.0)
}

fn lab_f(t: f32) -> f32 {
    if t > EPS {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > EPS {
        t3
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// RGB8 to 8-bit packed Lab.
pub(crate) fn rgb_to_lab8([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / XN;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / ZN;

    let fy = lab_f(y);
    let l = if y > EPS {
        116.0 * fy - 16.0
    } else {
        KAPPA * y
    };
    let a = 500.0 * (lab_f(x) - fy) + 128.0;
    let bb = 200.0 * (fy - lab_f(z)) + 128.0;
    [saturate_u8(l * 255.0 / 100.0), saturate_u8(a), saturate_u8(bb)]
}

/// 8-bit packed Lab back to RGB8.
pub(crate) fn lab8_to_rgb([l, a, b]: [u8; 3]) -> [u8; 3] {
    let l = f32::from(l) * 100.0 / 255.0;
    let a = f32::from(a) - 128.0;
    let b = f32::from(b) - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let y = if l > KAPPA * EPS { fy * fy * fy } else { l / KAPPA };
    let x = lab_f_inv(fx) * XN;
    let z = lab_f_inv(fz) * ZN;

    let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let g = -0.969_256 * x + 1.875_991 * y + 0.041_556 * z;
    let bl = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;
    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(bl)]
}

/// RGB8 to `(hue_deg, saturation, value)`.
pub(crate) fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [f32; 3] {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;
    let s = if v > 0.0 { diff / v } else { 0.0 };
    if diff <= 0.0 {
        return [0.0, s, v];
    }
    let mut h = if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    [h, s, v]
}

/// `(hue_deg, saturation, value)` back to RGB8. Saturation and value are clamped first.
pub(crate) fn hsv_to_rgb([h, s, v]: [f32; 3]) -> [u8; 3] {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 255.0);
    if s <= 0.0 {
        let c = saturate_u8(v);
        return [c, c, c];
    }
    let h = h.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [saturate_u8(r), saturate_u8(g), saturate_u8(b)]
}

/// Rec.601 luma, rounded.
pub(crate) fn luma([r, g, b]: [u8; 3]) -> u8 {
    saturate_u8(0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b))
}
