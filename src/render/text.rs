//! Text shaping and rasterization through `usvg`/`resvg`.
//!
//! Text is laid out as a one-line SVG `<text>` element against a font database built from the
//! system fonts plus an optional font directory.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::effects::composite::over_premul_in_place;
use crate::foundation::error::{TripError, TripResult};
use crate::render::frame::FrameRGB;

const FONT_FAMILIES: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

/// Extent of a single line of text relative to its origin on the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TextExtent {
    /// Advance from the origin to the right edge of the ink.
    pub(crate) width: f32,
    /// Height above the baseline.
    pub(crate) ascent: f32,
    /// Depth below the baseline.
    pub(crate) descent: f32,
}

impl TextExtent {
    /// Approximate metrics used when no font could shape the text.
    fn estimate(text: &str, size_px: f32) -> Self {
        Self {
            width: text.chars().count() as f32 * size_px * 0.6,
            ascent: size_px * 0.72,
            descent: size_px * 0.2,
        }
    }
}

pub(crate) struct TextRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl TextRenderer {
    pub(crate) fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub(crate) fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Measure `text` at `size_px`.
    pub(crate) fn measure(&self, text: &str, size_px: f32) -> TextExtent {
        if text.is_empty() {
            return TextExtent {
                width: 0.0,
                ascent: 0.0,
                descent: 0.0,
            };
        }
        let baseline = size_px * 2.0;
        let svg = text_svg(
            text,
            size_px,
            (size_px * 4.0).ceil() as u32,
            (size_px * 4.0).ceil() as u32,
            (0.0, baseline),
            [255, 255, 255],
        );
        let Ok(tree) = self.parse(&svg) else {
            return TextExtent::estimate(text, size_px);
        };
        if !tree.root().has_children() {
            return TextExtent::estimate(text, size_px);
        }
        let bbox = tree.root().abs_bounding_box();
        if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
            return TextExtent::estimate(text, size_px);
        }
        TextExtent {
            width: bbox.right().max(0.0),
            ascent: (baseline - bbox.top()).max(0.0),
            descent: (bbox.bottom() - baseline).max(0.0),
        }
    }

    /// Draw `text` with its origin at `(x, baseline_y)` in `color`, anti-aliased.
    pub(crate) fn draw(
        &self,
        frame: &mut FrameRGB,
        text: &str,
        size_px: f32,
        (x, baseline_y): (f32, f32),
        color: [u8; 3],
    ) -> TripResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let svg = text_svg(
            text,
            size_px,
            frame.width,
            frame.height,
            (x, baseline_y),
            color,
        );
        let tree = self.parse(&svg)?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(frame.width, frame.height)
            .ok_or_else(|| TripError::media("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );
        over_premul_in_place(frame, pixmap.data())
    }

    fn parse(&self, svg: &str) -> TripResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse text svg")?;
        Ok(tree)
    }
}

fn text_svg(
    text: &str,
    size_px: f32,
    width: u32,
    height: u32,
    (x, y): (f32, f32),
    [r, g, b]: [u8; 3],
) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{x}" y="{y}" font-family="{fam}" font-size="{size}" font-weight="bold" "#,
            r#"fill="rgb({r},{g},{b})" xml:space="preserve">{text}</text></svg>"#
        ),
        w = width.max(1),
        h = height.max(1),
        x = x,
        y = y,
        fam = FONT_FAMILIES,
        size = size_px,
        r = r,
        g = g,
        b = b,
        text = escape_xml(text),
    )
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Family-list query with a last-resort fallback to any installed face, so captions still render
/// on hosts that lack the named families.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}
