use super::*;
use crate::foundation::core::Resolution;

fn solid(w: u32, h: u32, px: [u8; 3]) -> FrameRGB {
    let mut f = FrameRGB::black(Resolution::new(w, h).unwrap());
    for c in f.data.chunks_exact_mut(3) {
        c.copy_from_slice(&px);
    }
    f
}

#[test]
fn blend_weight_0_is_black_and_1_is_identity() {
    let f = solid(3, 2, [10, 200, 255]);
    assert!(blend_toward_black(&f, 0.0).data.iter().all(|&c| c == 0));
    assert_eq!(blend_toward_black(&f, 1.0), f);
}

#[test]
fn blend_rounds_to_nearest() {
    let f = solid(1, 1, [200, 101, 3]);
    assert_eq!(blend_toward_black(&f, 0.5).pixel(0, 0), [100, 51, 2]);
}

#[test]
fn rect_clip_handles_out_of_bounds() {
    let r = PixelRect {
        x0: -5,
        y0: -5,
        x1: 3,
        y1: 100,
    };
    assert_eq!(r.clip(10, 10), Some((0, 0, 3, 10)));
    let off = PixelRect {
        x0: 20,
        y0: 0,
        x1: 30,
        y1: 5,
    };
    assert_eq!(off.clip(10, 10), None);
}

#[test]
fn fill_rect_over_only_touches_inside() {
    let mut f = solid(6, 6, [100, 100, 100]);
    fill_rect_over(
        &mut f,
        PixelRect {
            x0: 1,
            y0: 1,
            x1: 3,
            y1: 3,
        },
        [0, 0, 0],
        0.3,
    );
    assert_eq!(f.pixel(0, 0), [100, 100, 100]);
    assert_eq!(f.pixel(3, 3), [100, 100, 100]);
    assert_eq!(f.pixel(1, 1), [70, 70, 70]);
    assert_eq!(f.pixel(2, 2), [70, 70, 70]);
}

#[test]
fn over_premul_transparent_is_noop_and_opaque_replaces() {
    let mut f = solid(2, 1, [50, 60, 70]);
    let layer = vec![0, 0, 0, 0, 255, 255, 255, 255];
    over_premul_in_place(&mut f, &layer).unwrap();
    assert_eq!(f.pixel(0, 0), [50, 60, 70]);
    assert_eq!(f.pixel(1, 0), [255, 255, 255]);
}

#[test]
fn over_premul_rejects_size_mismatch() {
    let mut f = solid(2, 2, [0, 0, 0]);
    assert!(over_premul_in_place(&mut f, &[0u8; 4]).is_err());
}
