use super::*;

fn gray(res: Resolution, v: u8) -> FrameRGB {
    let mut f = FrameRGB::black(res);
    f.data.fill(v);
    f
}

#[test]
fn anchor_parses_case_insensitively() {
    assert_eq!("TOP".parse::<Anchor>().unwrap(), Anchor::Top);
    assert_eq!(" bottom ".parse::<Anchor>().unwrap(), Anchor::Bottom);
    assert_eq!("Center".parse::<Anchor>().unwrap(), Anchor::Center);
    let err = "left".parse::<Anchor>().unwrap_err();
    assert!(err.to_string().starts_with("validation error: "));
}

#[test]
fn caption_style_matches_reference_geometry_at_1080p() {
    let s = CaptionStyle::for_resolution(Resolution::default());
    assert_eq!(s.font_px, 48.0);
    assert_eq!(s.margin, 100);
    assert_eq!(s.padding, 20);
    assert_eq!(s.backing_opacity, 0.3);
}

#[test]
fn caption_origin_per_anchor() {
    assert_eq!(caption_origin(640, 360, 100, 20, Anchor::Bottom, 33), (270, 327));
    assert_eq!(caption_origin(640, 360, 100, 20, Anchor::Top, 33), (270, 33));
    assert_eq!(caption_origin(640, 360, 100, 20, Anchor::Center, 33), (270, 190));
    // Text wider than the frame starts left of the edge.
    assert_eq!(caption_origin(100, 50, 150, 10, Anchor::Top, 5).0, -25);
}

#[test]
fn gradient_rows_follow_blue_ramp() {
    let res = Resolution::new(4, 101).unwrap();
    let f = title_gradient(res);
    assert_eq!(f.pixel(0, 0), [0, 0, 0]);
    assert_eq!(f.pixel(3, 50), [0, 25, 50]);
    assert_eq!(f.pixel(2, 100), [0, 50, 100]);
}

#[test]
fn caption_darkens_backing_and_leaves_rest_untouched() {
    let res = Resolution::new(640, 360).unwrap();
    let r = OverlayRenderer::new(res, None);
    let src = gray(res, 200);
    let out = r.draw_caption(&src, "1/3", Anchor::Bottom).unwrap();

    let style = r.style();
    let extent = r.text.measure("1/3", style.font_px);
    let tw = extent.width.ceil() as i64;
    let (x, y) = caption_origin(640, 360, tw, extent.ascent.ceil() as i64, Anchor::Bottom, style.margin);
    let px = (x - style.padding + 2) as u32;
    assert_eq!(out.pixel(px, y as u32), [140, 140, 140]);

    // Far corner stays as it was.
    assert_eq!(out.pixel(0, 0), [200, 200, 200]);
    assert_eq!(out.resolution(), res);
    // The source frame is not modified.
    assert_eq!(src.pixel(px, y as u32), [200, 200, 200]);
}

#[test]
fn empty_caption_is_a_copy() {
    let res = Resolution::new(64, 36).unwrap();
    let r = OverlayRenderer::new(res, None);
    let src = gray(res, 90);
    assert_eq!(r.draw_caption(&src, "", Anchor::Top).unwrap(), src);
}

#[test]
fn title_screen_length_and_fade() {
    let res = Resolution::new(64, 36).unwrap();
    let r = OverlayRenderer::new(res, None);
    let fps = Fps::new(30).unwrap();

    let frames = r.title_screen("Trip", 1, fps).unwrap();
    assert_eq!(frames.len(), 30);
    assert!(frames[0].data.iter().all(|&v| v == 0));
    assert_eq!(frames[15], r.title_card("Trip").unwrap());
    assert!(frames.iter().all(|f| f.resolution() == res));

    let n = r
        .emit_title_screen("Thank you for watching!", 3, fps, |_| Ok::<(), TripError>(()))
        .unwrap();
    assert_eq!(n, 90);
}

#[test]
fn zero_duration_title_is_empty() {
    let res = Resolution::new(64, 36).unwrap();
    let r = OverlayRenderer::new(res, None);
    let frames = r.title_screen("x", 0, Fps::default()).unwrap();
    assert!(frames.is_empty());
}
