use super::*;

#[test]
fn mime_classification() {
    assert_eq!(MediaKind::from_mime("image/jpeg"), Some(MediaKind::Image));
    assert_eq!(MediaKind::from_mime("IMAGE/PNG"), Some(MediaKind::Image));
    assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Clip));
    assert_eq!(MediaKind::from_mime("application/pdf"), None);
    assert_eq!(MediaKind::from_mime(""), None);
}

#[test]
fn path_classification() {
    assert_eq!(MediaKind::from_path(Path::new("a/b.JPG")), Some(MediaKind::Image));
    assert_eq!(MediaKind::from_path(Path::new("beach.png")), Some(MediaKind::Image));
    assert_eq!(MediaKind::from_path(Path::new("surf.MOV")), Some(MediaKind::Clip));
    assert_eq!(MediaKind::from_path(Path::new("notes.txt")), None);
    assert_eq!(MediaKind::from_path(Path::new("no_extension")), None);
}

#[test]
fn descriptor_from_path_uses_file_name() {
    let d = MediaDescriptor::from_path("/trips/day1/002_lake.jpg").unwrap();
    assert_eq!(d.kind, MediaKind::Image);
    assert_eq!(d.display_name, "002_lake.jpg");
    assert!(MediaDescriptor::from_path("/trips/readme.md").is_none());
}

#[test]
fn descriptor_json_shape() {
    let d: MediaDescriptor =
        serde_json::from_str(r#"{"path":"x/clip.mp4","kind":"clip","display_name":"clip"}"#)
            .unwrap();
    assert_eq!(d.kind, MediaKind::Clip);
    assert_eq!(d.path, PathBuf::from("x/clip.mp4"));
}
