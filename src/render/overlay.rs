//! Caption overlays and title screens.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effects::composite::{PixelRect, fill_rect_over};
use crate::effects::transitions::FadeEnvelope;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{TripError, TripResult};
use crate::render::frame::FrameRGB;
use crate::render::text::TextRenderer;

/// Frames over which title screens fade in and out, independent of the run's transition setting.
pub const TITLE_FADE_FRAMES: u64 = 15;

/// Vertical placement of a caption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    #[default]
    Bottom,
    Center,
}

impl FromStr for Anchor {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "center" | "centre" => Ok(Self::Center),
            other => Err(TripError::validation(format!(
                "unknown caption position '{other}' (expected top, bottom or center)"
            ))),
        }
    }
}

/// Caption geometry in pixels for a given output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionStyle {
    pub font_px: f32,
    pub title_font_px: f32,
    /// Distance from the top or bottom edge to the caption baseline.
    pub margin: i64,
    /// Padding around the text inside the backing rectangle.
    pub padding: i64,
    /// Darkening applied by the backing rectangle.
    pub backing_opacity: f32,
}

impl CaptionStyle {
    /// Sizes scale with output height and match the reference geometry at 1080 rows.
    pub fn for_resolution(res: Resolution) -> Self {
        let scale = res.height as f32 / 1080.0;
        Self {
            font_px: (48.0 * scale).max(8.0),
            title_font_px: (80.0 * scale).max(12.0),
            margin: (100.0 * scale).round() as i64,
            padding: 20,
            backing_opacity: 0.3,
        }
    }
}

/// Draws captions and title screens for one output resolution.
pub struct OverlayRenderer {
    text: TextRenderer,
    resolution: Resolution,
    style: CaptionStyle,
    title_fade: u64,
}

impl OverlayRenderer {
    pub fn new(resolution: Resolution, font_dir: Option<&Path>) -> Self {
        Self {
            text: TextRenderer::new(font_dir),
            resolution,
            style: CaptionStyle::for_resolution(resolution),
            title_fade: TITLE_FADE_FRAMES,
        }
    }

    /// Override the title-screen fade ramp.
    pub fn with_title_fade(mut self, frames: u64) -> Self {
        self.title_fade = frames;
        self
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn style(&self) -> CaptionStyle {
        self.style
    }

    /// Number of font faces available for shaping. Zero means text falls back to estimated
    /// metrics and draws nothing visible.
    pub fn font_faces(&self) -> usize {
        self.text.face_count()
    }

    /// Return a copy of `frame` with `text` drawn in white over a darkened backing rectangle.
    ///
    /// Text wider than the frame is clipped at the frame edges.
    pub fn draw_caption(
        &self,
        frame: &FrameRGB,
        text: &str,
        anchor: Anchor,
    ) -> TripResult<FrameRGB> {
        let mut out = frame.clone();
        self.draw_caption_in_place(&mut out, text, anchor)?;
        Ok(out)
    }

    pub fn draw_caption_in_place(
        &self,
        frame: &mut FrameRGB,
        text: &str,
        anchor: Anchor,
    ) -> TripResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let extent = self.text.measure(text, self.style.font_px);
        let tw = extent.width.ceil() as i64;
        let th = extent.ascent.ceil() as i64;
        let below = extent.descent.ceil() as i64;
        let (x, y) = caption_origin(
            i64::from(frame.width),
            i64::from(frame.height),
            tw,
            th,
            anchor,
            self.style.margin,
        );

        let pad = self.style.padding;
        let rect = PixelRect {
            x0: x - pad,
            y0: y - th - pad,
            x1: x + tw + pad + 1,
            y1: y + below + pad + 1,
        };
        fill_rect_over(frame, rect, [0, 0, 0], self.style.backing_opacity);
        self.text.draw(
            frame,
            text,
            self.style.font_px,
            (x as f32, y as f32),
            [255, 255, 255],
        )
    }

    /// The unfaded title card: a vertical blue gradient with `text` centred in white.
    pub fn title_card(&self, text: &str) -> TripResult<FrameRGB> {
        let mut frame = title_gradient(self.resolution);
        if text.is_empty() {
            return Ok(frame);
        }
        let extent = self.text.measure(text, self.style.title_font_px);
        let tw = extent.width.ceil() as i64;
        let th = extent.ascent.ceil() as i64;
        let x = (i64::from(frame.width) - tw).div_euclid(2);
        let y = (i64::from(frame.height) + th).div_euclid(2);
        self.text.draw(
            &mut frame,
            text,
            self.style.title_font_px,
            (x as f32, y as f32),
            [255, 255, 255],
        )?;
        Ok(frame)
    }

    /// Stream a title screen of `duration_secs * fps` frames into `emit`, fading over the title
    /// ramp ([`TITLE_FADE_FRAMES`] unless overridden) at each end. Returns the number of frames emitted.
    pub fn emit_title_screen<E>(
        &self,
        text: &str,
        duration_secs: u32,
        fps: Fps,
        emit: impl FnMut(FrameRGB) -> Result<(), E>,
    ) -> Result<u64, E>
    where
        E: From<TripError>,
    {
        let card = self.title_card(text)?;
        let total = fps.frames_for_secs(duration_secs);
        FadeEnvelope::new(total, self.title_fade).expand(&card, emit)
    }

    /// Collect a whole title screen. Prefer [`Self::emit_title_screen`] for long runs.
    pub fn title_screen(
        &self,
        text: &str,
        duration_secs: u32,
        fps: Fps,
    ) -> TripResult<Vec<FrameRGB>> {
        let mut frames = Vec::new();
        self.emit_title_screen(text, duration_secs, fps, |f| {
            frames.push(f);
            Ok::<(), TripError>(())
        })?;
        Ok(frames)
    }
}

/// Baseline-left origin of a caption of `tw` by `th` pixels.
pub(crate) fn caption_origin(
    width: i64,
    height: i64,
    tw: i64,
    th: i64,
    anchor: Anchor,
    margin: i64,
) -> (i64, i64) {
    let x = (width - tw).div_euclid(2);
    let y = match anchor {
        Anchor::Bottom => height - margin,
        Anchor::Top => margin,
        Anchor::Center => (height + th).div_euclid(2),
    };
    (x, y)
}

/// Row `y` has blue rising linearly from 0 at the top to 100 at the bottom, green at half the
/// blue value and no red.
pub fn title_gradient(res: Resolution) -> FrameRGB {
    let mut frame = FrameRGB::black(res);
    let last = u64::from(res.height.saturating_sub(1)).max(1);
    for y in 0..res.height {
        let blue = (u64::from(y) * 100 / last) as u8;
        let green = blue / 2;
        for px in frame.row_mut(y).chunks_exact_mut(3) {
            px[0] = 0;
            px[1] = green;
            px[2] = blue;
        }
    }
    frame
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
