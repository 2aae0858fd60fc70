use super::*;
use crate::scene::media::MediaKind;

#[test]
fn defaults_match_reference_settings() {
    let cfg = RunConfig::default();
    assert_eq!(cfg.fps.get(), 30);
    assert_eq!(cfg.resolution, Resolution::new(1920, 1080).unwrap());
    assert_eq!(cfg.codec_id, "mp4v");
    assert_eq!(cfg.photo_duration_seconds, 1);
    assert_eq!(cfg.transition_frame_count, 15);
    assert_eq!(cfg.max_clip_duration_seconds, 5);
    assert_eq!(cfg.frames_per_photo(), 30);
    assert_eq!(cfg.max_clip_frames(), 150);
    assert_eq!(cfg.outro_text, DEFAULT_OUTRO_TEXT);
    cfg.validate().unwrap();
}

#[test]
fn validate_rejects_empty_codec() {
    let cfg = RunConfig {
        codec_id: "  ".to_string(),
        ..RunConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, TripError::Validation(_)));
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: RunConfig =
        serde_json::from_str(r#"{"fps": 24, "resolution": {"width": 640, "height": 360}}"#)
            .unwrap();
    assert_eq!(cfg.fps.get(), 24);
    assert_eq!(cfg.resolution.width, 640);
    assert_eq!(cfg.style_name, "cinematic");
    assert!(cfg.add_intro);
}

#[test]
fn zero_fps_fails_to_deserialize() {
    assert!(serde_json::from_str::<RunConfig>(r#"{"fps": 0}"#).is_err());
}

#[test]
fn manifest_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip.json");
    std::fs::write(
        &path,
        r#"{
            "title": "Lisbon",
            "config": {"style_name": "vintage", "caption_anchor": "top"},
            "media": [
                {"path": "img/a.jpg", "kind": "image", "display_name": "a.jpg"},
                {"path": "/abs/b.mp4", "kind": "clip", "display_name": "b.mp4"}
            ]
        }"#,
    )
    .unwrap();

    let m = RunManifest::from_json_file(&path).unwrap();
    assert_eq!(m.title.as_deref(), Some("Lisbon"));
    assert_eq!(m.config.style_name, "vintage");
    assert_eq!(m.config.caption_anchor, Anchor::Top);
    assert_eq!(m.media[0].path, dir.path().join("img/a.jpg"));
    assert_eq!(m.media[1].kind, MediaKind::Clip);
    assert_eq!(m.media[1].path, PathBuf::from("/abs/b.mp4"));
}

#[test]
fn malformed_manifest_is_serde_error() {
    let err = RunManifest::from_json_str("{").unwrap_err();
    assert!(matches!(err, TripError::Serde(_)));
}
