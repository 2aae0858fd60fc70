use std::cmp::Ordering;

use crate::effects::styles::Style;
use crate::foundation::error::TripResult;
use crate::render::overlay::OverlayRenderer;
use crate::scene::config::RunConfig;
use crate::scene::media::{MediaDescriptor, MediaKind};
use crate::timeline::adapters::{
    EmitFrame, ItemContext, MediaAdapter, MotionClipAdapter, StillImageAdapter,
};

/// Comparator deciding the order of media items on the timeline.
pub type MediaOrder = Box<dyn Fn(&MediaDescriptor, &MediaDescriptor) -> Ordering + Send + Sync>;

/// Default ordering: display name ascending.
pub fn by_display_name(a: &MediaDescriptor, b: &MediaDescriptor) -> Ordering {
    a.display_name.cmp(&b.display_name)
}

/// An item that contributed no frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedItem {
    pub display_name: String,
    pub reason: String,
}

/// Frame accounting for one assembled timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub frames: u64,
    pub intro_frames: u64,
    pub outro_frames: u64,
    pub item_frames: Vec<u64>,
    pub skipped: Vec<SkippedItem>,
}

pub struct TimelineAssembler {
    cfg: RunConfig,
    style: Style,
    overlay: OverlayRenderer,
    order: MediaOrder,
    still: StillImageAdapter,
    clip: MotionClipAdapter,
}

impl TimelineAssembler {
    pub fn new(cfg: &RunConfig) -> Self {
        let overlay = OverlayRenderer::new(cfg.resolution, cfg.font_dir.as_deref())
            .with_title_fade(cfg.title_fade_frames);
        if overlay.font_faces() == 0 {
            tracing::warn!("no fonts available; captions and titles will have no text");
        }
        Self {
            cfg: cfg.clone(),
            style: Style::resolve(&cfg.style_name),
            overlay,
            order: Box::new(by_display_name),
            still: StillImageAdapter,
            clip: MotionClipAdapter,
        }
    }

    /// Replace the item ordering.
    pub fn with_order(
        mut self,
        order: impl Fn(&MediaDescriptor, &MediaDescriptor) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.order = Box::new(order);
        self
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Items in timeline order. Ties keep their input order.
    pub fn ordered<'m>(&self, media: &'m [MediaDescriptor]) -> Vec<&'m MediaDescriptor> {
        let mut items: Vec<&MediaDescriptor> = media.iter().collect();
        items.sort_by(|a, b| (self.order)(a, b));
        items
    }

    /// Stream intro, items and outro into `emit`.
    ///
    /// Item failures are logged and skipped. Errors returned by `emit` abort the assembly.
    pub fn assemble(
        &self,
        media: &[MediaDescriptor],
        title: Option<&str>,
        emit: &mut EmitFrame<'_>,
    ) -> TripResult<AssemblyReport> {
        let mut report = AssemblyReport::default();
        self.assemble_into(media, title, emit, &mut report)?;
        Ok(report)
    }

    /// [`TimelineAssembler::assemble`] into a caller-owned report.
    ///
    /// On an aborting error `report` still holds the accounting up to the failure.
    pub fn assemble_into(
        &self,
        media: &[MediaDescriptor],
        title: Option<&str>,
        emit: &mut EmitFrame<'_>,
        report: &mut AssemblyReport,
    ) -> TripResult<()> {

        if self.cfg.add_intro
            && let Some(title) = title.filter(|t| !t.trim().is_empty())
        {
            report.intro_frames = self.overlay.emit_title_screen(
                title,
                self.cfg.intro_duration_seconds,
                self.cfg.fps,
                |f| emit(f),
            )?;
            tracing::debug!(frames = report.intro_frames, "intro emitted");
        }

        let ordered = self.ordered(media);
        let count = ordered.len();
        for (index, item) in ordered.into_iter().enumerate() {
            let ctx = ItemContext {
                index,
                count,
                cfg: &self.cfg,
                style: self.style,
                overlay: &self.overlay,
            };
            let adapter: &dyn MediaAdapter = match item.kind {
                MediaKind::Image => &self.still,
                MediaKind::Clip => &self.clip,
            };
            let mut item_frames = 0u64;
            let result = adapter.emit(item, &ctx, &mut |f| {
                emit(f)?;
                item_frames += 1;
                Ok(())
            });
            match result {
                Ok(n) => {
                    tracing::debug!(
                        item = %item.display_name,
                        kind = %item.kind,
                        frames = n,
                        "item emitted"
                    );
                    report.item_frames.push(n);
                }
                Err(e) if e.is_run_fatal() => {
                    report.item_frames.push(item_frames);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        item = %item.display_name,
                        path = %item.path.display(),
                        error = %e,
                        "skipping media item"
                    );
                    report.item_frames.push(item_frames);
                    report.skipped.push(SkippedItem {
                        display_name: item.display_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if self.cfg.add_outro {
            report.outro_frames = self.overlay.emit_title_screen(
                &self.cfg.outro_text,
                self.cfg.outro_duration_seconds,
                self.cfg.fps,
                |f| emit(f),
            )?;
            tracing::debug!(frames = report.outro_frames, "outro emitted");
        }

        report.frames =
            report.intro_frames + report.item_frames.iter().sum::<u64>() + report.outro_frames;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assembler.rs"]
mod tests;
