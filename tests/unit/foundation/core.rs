use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(24).unwrap().get(), 24);
}

#[test]
fn fps_frame_counts_are_exact() {
    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.frames_for_secs(1), 30);
    assert_eq!(fps.frames_for_secs(3), 90);
    assert_eq!(fps.frames_for_secs(0), 0);
}

#[test]
fn fps_deserialize_validates() {
    let ok: Fps = serde_json::from_str("25").unwrap();
    assert_eq!(ok.get(), 25);
    assert!(serde_json::from_str::<Fps>("0").is_err());
}

#[test]
fn resolution_parses_wxh() {
    let r: Resolution = "1280x720".parse().unwrap();
    assert_eq!(r, Resolution::new(1280, 720).unwrap());
    assert!("1280".parse::<Resolution>().is_err());
    assert!("0x720".parse::<Resolution>().is_err());
    assert_eq!(r.to_string(), "1280x720");
}
