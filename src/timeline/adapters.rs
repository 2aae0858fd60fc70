use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::assets::media::{ClipDecoder, probe_video};
use crate::effects::styles::Style;
use crate::effects::transitions::FadeEnvelope;
use crate::foundation::core::Resolution;
use crate::foundation::error::{TripError, TripResult};
use crate::render::frame::FrameRGB;
use crate::render::letterbox;
use crate::render::overlay::OverlayRenderer;
use crate::scene::config::RunConfig;
use crate::scene::media::MediaDescriptor;

/// Clip frames letterboxed together per parallel batch.
const CLIP_BATCH: usize = 8;

/// Frame consumer shared by adapters and the assembler. Errors it returns are sink failures.
pub type EmitFrame<'e> = dyn FnMut(FrameRGB) -> TripResult<()> + 'e;

/// Per-item inputs shared by the adapters.
pub struct ItemContext<'a> {
    /// 0-based position in the ordered media list.
    pub index: usize,
    /// Number of items in the list, skipped ones included.
    pub count: usize,
    /// Settings of the run this item belongs to.
    pub cfg: &'a RunConfig,
    /// Grade applied to still keyframes.
    pub style: Style,
    /// Caption and title drawing for the run's resolution.
    pub overlay: &'a OverlayRenderer,
}

impl ItemContext<'_> {
    /// 1-based `position/count` label drawn on stills.
    pub fn caption(&self) -> String {
        format!("{}/{}", self.index + 1, self.count)
    }

    /// Output frame size of the run.
    pub fn resolution(&self) -> Resolution {
        self.cfg.resolution
    }
}

/// Turns one media item into a run of canonical frames.
///
/// Errors raised before the first frame is emitted mean the item contributed nothing.
pub trait MediaAdapter: Send + Sync {
    fn emit(
        &self,
        item: &MediaDescriptor,
        ctx: &ItemContext<'_>,
        out: &mut EmitFrame<'_>,
    ) -> TripResult<u64>;
}

/// Still image: one graded, captioned keyframe replicated for the photo duration with fades.
#[derive(Debug, Default, Clone, Copy)]
pub struct StillImageAdapter;

impl StillImageAdapter {
    pub fn keyframe(&self, item: &MediaDescriptor, ctx: &ItemContext<'_>) -> TripResult<FrameRGB> {
        let src = decode_image(&item.path)?;
        let normalized = letterbox::normalize(&src, ctx.resolution());
        let mut graded = ctx.style.apply(&normalized);
        ctx.overlay
            .draw_caption_in_place(&mut graded, &ctx.caption(), ctx.cfg.caption_anchor)?;
        Ok(graded)
    }
}

impl MediaAdapter for StillImageAdapter {
    fn emit(
        &self,
        item: &MediaDescriptor,
        ctx: &ItemContext<'_>,
        out: &mut EmitFrame<'_>,
    ) -> TripResult<u64> {
        let key = self.keyframe(item, ctx)?;
        FadeEnvelope::new(ctx.cfg.frames_per_photo(), ctx.cfg.transition_frame_count)
            .expand(&key, |f| out(f))
    }
}

/// Motion clip: up to the clip cap of decoded frames, letterboxed only.
#[derive(Debug, Default, Clone, Copy)]
pub struct MotionClipAdapter;

impl MediaAdapter for MotionClipAdapter {
    fn emit(
        &self,
        item: &MediaDescriptor,
        ctx: &ItemContext<'_>,
        out: &mut EmitFrame<'_>,
    ) -> TripResult<u64> {
        let info = probe_video(&item.path)?;
        let mut decoder = ClipDecoder::open(&info, ctx.cfg.fps, ctx.cfg.max_clip_frames())?;
        let emitted = emit_decoded(&mut decoder, item, ctx, out)?;
        tracing::debug!(
            item = %item.display_name,
            frames = emitted,
            source_fps = info.source_fps(),
            "clip decoded"
        );
        Ok(emitted)
    }
}

/// Letterbox and emit every frame `decoder` yields.
///
/// A decode failure before the first frame, or a clip that yields nothing under a non-zero cap,
/// fails the item. A failure after that ends the clip early with the frames already emitted.
pub(crate) fn emit_decoded(
    decoder: &mut ClipDecoder,
    item: &MediaDescriptor,
    ctx: &ItemContext<'_>,
    out: &mut EmitFrame<'_>,
) -> TripResult<u64> {
    let res = ctx.resolution();
    let mut emitted = 0u64;
    loop {
        let batch = match decoder.next_batch(CLIP_BATCH) {
            Ok(batch) => batch,
            Err(e) if emitted > 0 => {
                tracing::warn!(
                    item = %item.display_name,
                    error = %e,
                    frames = emitted,
                    "clip decode stopped early"
                );
                break;
            }
            Err(e) => return Err(e),
        };
        if batch.is_empty() {
            break;
        }
        let frames: Vec<FrameRGB> = batch
            .par_iter()
            .map(|img| letterbox::normalize(img, res))
            .collect();
        for f in frames {
            out(f)?;
            emitted += 1;
        }
    }
    if emitted == 0 && ctx.cfg.max_clip_frames() > 0 {
        return Err(TripError::media(format!(
            "clip '{}' decoded no frames",
            item.path.display()
        )));
    }
    Ok(emitted)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/adapters.rs"]
mod tests;
