use super::*;
use crate::foundation::core::{Fps, Resolution};

fn cfg(path: &Path, codec: &str) -> SinkConfig {
    SinkConfig {
        path: path.to_path_buf(),
        codec_id: codec.to_string(),
        fps: Fps::new(10).unwrap(),
        resolution: Resolution::new(32, 18).unwrap(),
    }
}

#[test]
fn codec_ids_map_to_encoders() {
    assert_eq!(encoder_for_codec("mp4v").unwrap().encoder, "mpeg4");
    assert_eq!(encoder_for_codec("AVC1").unwrap().encoder, "libx264");
    assert_eq!(encoder_for_codec("h264").unwrap().encoder, "libx264");
    assert_eq!(encoder_for_codec("MJPG").unwrap().pix_fmt, "yuvj420p");
    assert_eq!(encoder_for_codec("hevc").unwrap().encoder, "libx265");
    assert_eq!(encoder_for_codec("vp09").unwrap().encoder, "libvpx-vp9");
    assert!(encoder_for_codec("zzzz").is_none());
}

#[test]
fn faststart_only_for_mp4_family() {
    assert!(wants_faststart(Path::new("a/trip.MP4")));
    assert!(wants_faststart(Path::new("trip.mov")));
    assert!(!wants_faststart(Path::new("trip.avi")));
    assert!(!wants_faststart(Path::new("trip")));
}

#[test]
fn unknown_codec_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::default());
    let err = sink
        .begin(cfg(&dir.path().join("out.mp4"), "nope"))
        .unwrap_err();
    assert!(matches!(err, TripError::WriterOpen(_)));
    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn existing_output_without_overwrite_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    std::fs::write(&out, b"keep").unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts { overwrite: false });
    let err = sink.begin(cfg(&out, "mp4v")).unwrap_err();
    assert!(matches!(err, TripError::WriterOpen(_)));
    assert_eq!(std::fs::read(&out).unwrap(), b"keep");
}

#[test]
fn push_before_begin_is_encode_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::default());
    let frame = FrameRGB::black(Resolution::new(32, 18).unwrap());
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(matches!(err, TripError::Encode(_)));
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/c.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn encodes_small_clip_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clip.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::default());
    sink.begin(cfg(&out, "mp4v")).unwrap();
    let mut frame = FrameRGB::black(Resolution::new(32, 18).unwrap());
    for i in 0..5u64 {
        frame.data.fill((i * 40) as u8);
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}
