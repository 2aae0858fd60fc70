use super::*;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::TripError;

fn small_cfg() -> RunConfig {
    RunConfig {
        fps: Fps::new(30).unwrap(),
        resolution: Resolution::new(64, 36).unwrap(),
        style_name: "cinematic".to_string(),
        ..RunConfig::default()
    }
}

fn write_pngs(dir: &std::path::Path, names: &[&str]) -> Vec<MediaDescriptor> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            image::RgbImage::from_pixel(48, 32, image::Rgb([90, 140, 200]))
                .save(&path)
                .unwrap();
            MediaDescriptor::new(path, MediaKind::Image, *name)
        })
        .collect()
}

#[test]
fn default_order_sorts_by_display_name() {
    let a = TimelineAssembler::new(&small_cfg());
    let media = vec![
        MediaDescriptor::new("z", MediaKind::Image, "c.jpg"),
        MediaDescriptor::new("y", MediaKind::Clip, "a.mp4"),
        MediaDescriptor::new("x", MediaKind::Image, "b.jpg"),
    ];
    let names: Vec<_> = a
        .ordered(&media)
        .iter()
        .map(|m| m.display_name.as_str())
        .collect();
    assert_eq!(names, ["a.mp4", "b.jpg", "c.jpg"]);
}

#[test]
fn custom_order_is_respected() {
    let a = TimelineAssembler::new(&small_cfg()).with_order(|x, y| y.display_name.cmp(&x.display_name));
    let media = vec![
        MediaDescriptor::new("x", MediaKind::Image, "a"),
        MediaDescriptor::new("y", MediaKind::Image, "b"),
    ];
    assert_eq!(a.ordered(&media)[0].display_name, "b");
}

#[test]
fn full_timeline_frame_accounting() {
    let dir = tempfile::tempdir().unwrap();
    let media = write_pngs(dir.path(), &["1.png", "2.png", "3.png"]);
    let a = TimelineAssembler::new(&small_cfg());
    assert_eq!(a.style(), Style::Cinematic);

    let mut n = 0u64;
    let report = a
        .assemble(&media, Some("Weekend"), &mut |_| {
            n += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(report.intro_frames, 90);
    assert_eq!(report.outro_frames, 60);
    assert_eq!(report.item_frames, vec![30, 30, 30]);
    assert_eq!(report.frames, 240);
    assert_eq!(n, 240);
    assert!(report.skipped.is_empty());
}

#[test]
fn bad_item_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut media = write_pngs(dir.path(), &["1.png", "2.png", "3.png"]);
    media.push(MediaDescriptor::new(
        dir.path().join("missing.png"),
        MediaKind::Image,
        "0_missing.png",
    ));
    let a = TimelineAssembler::new(&small_cfg());
    let report = a.assemble(&media, Some("Trip"), &mut |_| Ok(())).unwrap();
    assert_eq!(report.frames, 90 + 60 + 90);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].display_name, "0_missing.png");
    assert_eq!(report.item_frames, vec![0, 30, 30, 30]);
}

#[test]
fn intro_needs_a_title_and_outro_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let media = write_pngs(dir.path(), &["1.png"]);
    let cfg = RunConfig {
        add_outro: false,
        ..small_cfg()
    };
    let a = TimelineAssembler::new(&cfg);
    let report = a.assemble(&media, None, &mut |_| Ok(())).unwrap();
    assert_eq!(report.intro_frames, 0);
    assert_eq!(report.outro_frames, 0);
    assert_eq!(report.frames, 30);
}

#[test]
fn sink_failure_aborts_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let media = write_pngs(dir.path(), &["1.png", "2.png"]);
    let a = TimelineAssembler::new(&small_cfg());
    let mut n = 0;
    let err = a
        .assemble(&media, None, &mut |_| {
            n += 1;
            if n > 40 {
                return Err(TripError::encode("disk full"));
            }
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, TripError::Encode(_)));
    assert_eq!(n, 41);
}

#[test]
fn aborted_assembly_keeps_accounting_up_to_the_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut media = write_pngs(dir.path(), &["b.png"]);
    media.push(MediaDescriptor::new(
        dir.path().join("gone.mp4"),
        MediaKind::Clip,
        "a.mp4",
    ));
    let cfg = RunConfig {
        add_outro: false,
        ..small_cfg()
    };
    let assembler = TimelineAssembler::new(&cfg);

    let mut accepted = 0u64;
    let mut report = AssemblyReport::default();
    let err = assembler
        .assemble_into(
            &media,
            None,
            &mut |_| {
                if accepted == 5 {
                    return Err(TripError::encode("pipe closed"));
                }
                accepted += 1;
                Ok(())
            },
            &mut report,
        )
        .unwrap_err();

    assert!(err.is_run_fatal());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].display_name, "a.mp4");
    assert_eq!(report.item_frames, vec![0, 5]);
}
