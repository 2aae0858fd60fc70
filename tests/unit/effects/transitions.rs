use super::*;
use crate::foundation::core::Resolution;

#[test]
fn first_tick_is_black_and_last_ramp_tick_is_nearly_unblended() {
    let env = FadeEnvelope::new(30, 15);
    assert_eq!(env.weight(0), Some(0.0));
    let w14 = env.weight(14).unwrap();
    assert!((w14 - 14.0 / 15.0).abs() < 1e-6);
    assert_eq!(env.weight(15), None);
}

#[test]
fn fade_out_starts_after_total_minus_ramp() {
    let env = FadeEnvelope::new(60, 15);
    assert_eq!(env.weight(45), None);
    assert!((env.weight(46).unwrap() - 14.0 / 15.0).abs() < 1e-6);
    assert!((env.weight(59).unwrap() - 1.0 / 15.0).abs() < 1e-6);
}

#[test]
fn overlapping_ramps_prefer_fade_in() {
    // 30 ticks with a 20 tick ramp: ticks 11..20 satisfy both conditions.
    let env = FadeEnvelope::new(30, 20);
    assert!((env.weight(15).unwrap() - 15.0 / 20.0).abs() < 1e-6);
    assert!((env.weight(25).unwrap() - 5.0 / 20.0).abs() < 1e-6);
}

#[test]
fn zero_ramp_disables_fades() {
    let env = FadeEnvelope::new(10, 0);
    assert!((0..10).all(|i| env.weight(i).is_none()));
}

#[test]
fn expand_emits_exactly_total_frames() {
    let key = FrameRGB::black(Resolution::new(4, 4).unwrap());
    let mut n = 0u64;
    let total = FadeEnvelope::new(30, 15)
        .expand::<()>(&key, |_| {
            n += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(total, 30);
    assert_eq!(n, 30);
}

#[test]
fn frame_at_blends_toward_black() {
    let mut key = FrameRGB::black(Resolution::new(1, 1).unwrap());
    key.put_pixel(0, 0, [150, 150, 150]);
    let env = FadeEnvelope::new(30, 15);
    assert_eq!(env.frame_at(&key, 0).pixel(0, 0), [0, 0, 0]);
    assert_eq!(env.frame_at(&key, 20).pixel(0, 0), [150, 150, 150]);
    assert_eq!(env.frame_at(&key, 5).pixel(0, 0), [50, 50, 50]);
}
