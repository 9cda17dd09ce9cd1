//! Text layer rendering.
//!
//! The caption is measured glyph by glyph to find its tight ink box, placed
//! by percentage of the leftover room, then only the part of it that can
//! reach the canvas (widened by the stroke) is rasterized and stamped onto a
//! transparent canvas once per stroke offset. Memory stays bounded by the
//! canvas and a single glyph, however large the caption.

use image::{imageops, GrayImage, Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use textbehind_style_model::TextStyle;

use crate::bitmap_font;
use crate::font::{FontFace, FontResolver, ResolvedFont};

/// Extra pixels between lines of multi-line captions.
const LINE_SPACING: f32 = 4.0;

/// A measured caption and the rasterized part of it.
///
/// `width` and `height` are the tight ink box of the whole caption.
/// `coverage` may be a window of that box starting at `offset`; pixels
/// outside the window were never rasterized.
#[derive(Debug, Clone)]
pub struct TextRun {
    coverage: GrayImage,
    width: u32,
    height: u32,
    offset: (u32, u32),
}

/// Ink-space rectangle `(x0, y0, x1, y1)`, end-exclusive.
pub type InkWindow = (u32, u32, u32, u32);

impl TextRun {
    /// Wrap a coverage mask, trimming empty rows and columns.
    pub fn from_coverage(mask: GrayImage) -> Self {
        let coverage = trim_to_ink(&mask);
        let (width, height) = coverage.dimensions();
        Self {
            coverage,
            width,
            height,
            offset: (0, 0),
        }
    }

    /// Lay out and rasterize all of `text` with `font`.
    pub fn layout(font: &ResolvedFont, text: &str) -> Self {
        Self::layout_within(font, text, |width, height| (0, 0, width, height))
    }

    /// Lay out `text`, rasterizing only the window that `window` picks once
    /// it has seen the ink box size. The window is clamped to the ink box.
    pub fn layout_within<F>(font: &ResolvedFont, text: &str, window: F) -> Self
    where
        F: FnOnce(u32, u32) -> InkWindow,
    {
        let mut bounds: Option<(i64, i64, i64, i64)> = None;
        for_each_glyph(font, text, |glyph| {
            let (w, h) = glyph.mask.dimensions();
            let b = (glyph.x, glyph.y, glyph.x + w as i64, glyph.y + h as i64);
            bounds = Some(match bounds {
                None => b,
                Some(a) => (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)),
            });
        });
        let Some((ink_x, ink_y, ink_x1, ink_y1)) = bounds else {
            return Self::from_coverage(GrayImage::new(0, 0));
        };
        let width = u32::try_from(ink_x1 - ink_x).unwrap_or(u32::MAX);
        let height = u32::try_from(ink_y1 - ink_y).unwrap_or(u32::MAX);

        let (wx0, wy0, wx1, wy1) = window(width, height);
        let (wx1, wy1) = (wx1.min(width), wy1.min(height));
        let (wx0, wy0) = (wx0.min(wx1), wy0.min(wy1));

        let mut coverage = GrayImage::new(wx1 - wx0, wy1 - wy0);
        if wx1 > wx0 && wy1 > wy0 {
            let (origin_x, origin_y) = (ink_x + wx0 as i64, ink_y + wy0 as i64);
            for_each_glyph(font, text, |glyph| {
                blit_max(&mut coverage, &glyph.mask, glyph.x - origin_x, glyph.y - origin_y);
            });
        }

        Self {
            coverage,
            width,
            height,
            offset: (wx0, wy0),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The rasterized window of the ink box.
    pub fn coverage(&self) -> &GrayImage {
        &self.coverage
    }

    /// Where [`TextRun::coverage`] starts inside the ink box.
    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }
}

/// Anything a text run can be stamped onto.
pub trait TextSink {
    /// Draw `run` with its top-left ink corner at `(x, y)`.
    fn draw_run(&mut self, x: i32, y: i32, run: &TextRun, ink: Rgba<u8>);
}

impl TextSink for RgbaImage {
    fn draw_run(&mut self, x: i32, y: i32, run: &TextRun, ink: Rgba<u8>) {
        let (width, height) = self.dimensions();
        let (cov_w, cov_h) = run.coverage.dimensions();
        let base_x = x as i64 + run.offset.0 as i64;
        let base_y = y as i64 + run.offset.1 as i64;

        // Clip the run against the canvas; text may sit partly or fully off it.
        let x0 = (-base_x).clamp(0, cov_w as i64);
        let y0 = (-base_y).clamp(0, cov_h as i64);
        let x1 = (width as i64 - base_x).clamp(0, cov_w as i64);
        let y1 = (height as i64 - base_y).clamp(0, cov_h as i64);

        for cy in y0..y1 {
            for cx in x0..x1 {
                let c = run.coverage.get_pixel(cx as u32, cy as u32)[0];
                if c == 0 {
                    continue;
                }
                let px = self.get_pixel_mut((base_x + cx) as u32, (base_y + cy) as u32);
                let alpha = mix(px[3], ink[3], c);
                *px = Rgba([ink[0], ink[1], ink[2], alpha]);
            }
        }
    }
}

/// Draw origin for a run: slack times percentage, truncated toward zero.
///
/// Slack is negative when the text is larger than the canvas; the result
/// is deliberately left unclamped.
pub fn placement(
    canvas: (u32, u32),
    text: (u32, u32),
    x_position: f64,
    y_position: f64,
) -> (i32, i32) {
    let slack_x = canvas.0 as i64 - text.0 as i64;
    let slack_y = canvas.1 as i64 - text.1 as i64;
    (
        (slack_x as f64 * (x_position / 100.0)) as i32,
        (slack_y as f64 * (y_position / 100.0)) as i32,
    )
}

/// The part of a `text`-sized ink box drawn at `origin` that any stroke
/// offset up to `thickness` can land on `canvas`.
pub fn visible_window(
    canvas: (u32, u32),
    text: (u32, u32),
    origin: (i32, i32),
    thickness: u32,
) -> InkWindow {
    let t = thickness as i64;
    let span = |canvas: u32, text: u32, origin: i32| {
        let lo = (-(origin as i64) - t).clamp(0, text as i64);
        let hi = (canvas as i64 - origin as i64 + t).clamp(lo, text as i64);
        (lo as u32, hi as u32)
    };
    let (x0, x1) = span(canvas.0, text.0, origin.0);
    let (y0, y1) = span(canvas.1, text.1, origin.1);
    (x0, y0, x1, y1)
}

/// Draw the run at every integer offset in `[-t, t]²`: `(2t + 1)²` draws,
/// giving a square halo. `t = 0` is the plain fill.
pub fn draw_stroked<S: TextSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    run: &TextRun,
    ink: Rgba<u8>,
    thickness: u32,
) {
    let t = thickness as i32;
    for dx in -t..=t {
        for dy in -t..=t {
            sink.draw_run(x.saturating_add(dx), y.saturating_add(dy), run, ink);
        }
    }
}

/// Render `style` onto a fully transparent `width × height` canvas.
pub fn render_text_layer(
    style: &TextStyle,
    width: u32,
    height: u32,
    fonts: &FontResolver,
) -> RgbaImage {
    let canvas = (width, height);
    let (x_position, y_position) = (style.x_position(), style.y_position());
    let thickness = style.stroke_thickness();

    let font = fonts.resolve(style.font_size());
    let run = TextRun::layout_within(&font, style.text(), |w, h| {
        let origin = placement(canvas, (w, h), x_position, y_position);
        visible_window(canvas, (w, h), origin, thickness)
    });
    let (x, y) = placement(canvas, run.dimensions(), x_position, y_position);

    tracing::debug!(
        font_tier = %font.tier,
        text_width = run.width(),
        text_height = run.height(),
        rasterized = ?run.coverage().dimensions(),
        x,
        y,
        thickness,
        "Rendering text layer"
    );

    let mut layer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    draw_stroked(&mut layer, x, y, &run, Rgba(style.rgba()), thickness);
    layer
}

/// One glyph's ink, trimmed, at its layout position.
struct GlyphInk {
    x: i64,
    y: i64,
    mask: GrayImage,
}

/// Rasterize each glyph of `text` on its own and hand it to `visit`.
fn for_each_glyph(font: &ResolvedFont, text: &str, mut visit: impl FnMut(GlyphInk)) {
    match &font.face {
        FontFace::TrueType(face) => {
            for glyph in layout_truetype(face, font.size, text) {
                if let Some(ink) = outline_ink(&glyph) {
                    visit(ink);
                }
            }
        }
        FontFace::BuiltIn => {
            for (x, y, ch) in bitmap_font::pen_positions(text) {
                if let Some(ink) = trimmed_ink(x, y, &bitmap_font::glyph_mask(ch)) {
                    visit(ink);
                }
            }
        }
    }
}

/// Font size is an em size, the way TrueType renderers take it; rusttype
/// scales by ascent-to-descent height instead.
fn em_scale(font: &Font<'_>, size: u32) -> Scale {
    let units_per_em = font.units_per_em().max(1) as f32;
    let v = font.v_metrics_unscaled();
    let height = (v.ascent - v.descent) / units_per_em;
    Scale::uniform(size as f32 * height)
}

fn layout_truetype<'f>(font: &Font<'f>, size: u32, text: &str) -> Vec<PositionedGlyph<'f>> {
    let scale = em_scale(font, size);
    let v = font.v_metrics(scale);
    let line_advance = v.ascent - v.descent + v.line_gap + LINE_SPACING;

    text.lines()
        .enumerate()
        .flat_map(|(row, line)| {
            let baseline = v.ascent + row as f32 * line_advance;
            font.layout(line, scale, point(0.0, baseline))
        })
        .collect()
}

fn outline_ink(glyph: &PositionedGlyph<'_>) -> Option<GlyphInk> {
    let bb = glyph.pixel_bounding_box()?;
    let mut mask = GrayImage::new(bb.width() as u32, bb.height() as u32);
    glyph.draw(|gx, gy, v| {
        if gx < mask.width() && gy < mask.height() {
            let value = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            mask.get_pixel_mut(gx, gy)[0] = value;
        }
    });
    trimmed_ink(bb.min.x as i64, bb.min.y as i64, &mask)
}

fn trimmed_ink(x: i64, y: i64, mask: &GrayImage) -> Option<GlyphInk> {
    let (x0, y0, x1, y1) = ink_bounds(mask)?;
    Some(GlyphInk {
        x: x + x0 as i64,
        y: y + y0 as i64,
        mask: imageops::crop_imm(mask, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image(),
    })
}

/// Combine `src` into `dst` at `(x, y)` by per-pixel max, clipped to `dst`.
fn blit_max(dst: &mut GrayImage, src: &GrayImage, x: i64, y: i64) {
    let (dst_w, dst_h) = dst.dimensions();
    let (src_w, src_h) = src.dimensions();
    let sx0 = (-x).clamp(0, src_w as i64);
    let sy0 = (-y).clamp(0, src_h as i64);
    let sx1 = (dst_w as i64 - x).clamp(sx0, src_w as i64);
    let sy1 = (dst_h as i64 - y).clamp(sy0, src_h as i64);

    for sy in sy0..sy1 {
        for sx in sx0..sx1 {
            let value = src.get_pixel(sx as u32, sy as u32)[0];
            let px = dst.get_pixel_mut((x + sx) as u32, (y + sy) as u32);
            px[0] = px[0].max(value);
        }
    }
}

/// Move `dst` toward `src` by `coverage / 255`.
fn mix(dst: u8, src: u8, coverage: u8) -> u8 {
    let c = coverage as u32;
    ((dst as u32 * (255 - c) + src as u32 * c + 127) / 255) as u8
}

/// Inclusive `(x0, y0, x1, y1)` of the non-zero pixels, if any.
fn ink_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in mask.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn trim_to_ink(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    match ink_bounds(mask) {
        Some((0, 0, x1, y1)) if (x1, y1) == (width - 1, height - 1) => mask.clone(),
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(mask, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => GrayImage::new(0, 0),
    }
}
