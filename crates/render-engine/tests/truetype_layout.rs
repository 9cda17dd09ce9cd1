//! Layout with a real TrueType face. Skipped on machines with neither the
//! bundled nor the system font installed.

use image::RgbaImage;
use textbehind_common::config::AppConfig;
use textbehind_render_engine::font::FontFace;
use textbehind_render_engine::{
    placement, render_text_layer, visible_window, FontResolver, FontTier, TextRun,
};
use textbehind_style_model::{TextStyle, MAX_FONT_SIZE};

fn truetype_fonts() -> Option<FontResolver> {
    let fonts = FontResolver::new(AppConfig::default().fonts);
    let usable = fonts
        .report()
        .iter()
        .any(|status| status.tier != FontTier::BuiltIn && status.usable);
    if !usable {
        eprintln!("no TrueType font found, skipping");
        return None;
    }
    Some(fonts)
}

fn ink_bounds(layer: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    layer
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .fold(None, |acc, (x, y, _)| {
            Some(match acc {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            })
        })
}

#[test]
fn resolves_a_truetype_face() {
    let Some(fonts) = truetype_fonts() else { return };
    let font = fonts.resolve(60);
    assert_ne!(font.tier, FontTier::BuiltIn);
    assert!(matches!(font.face, FontFace::TrueType(_)));
    assert!(font.path.is_some());
}

#[test]
fn positions_follow_the_ink_box() {
    let Some(fonts) = truetype_fonts() else { return };
    let (w, h) = (400, 200);
    let style = TextStyle::new("EPIC", 60, "#000000", 255, 0.0, 0.0, 0).unwrap();
    let run = TextRun::layout(&fonts.resolve(60), style.text());
    assert!(run.width() < w && run.height() < h);

    let layer = render_text_layer(&style, w, h, &fonts);
    let (x0, y0, x1, y1) = ink_bounds(&layer).unwrap();
    assert_eq!((x0, y0), (0, 0));
    assert_eq!((x1 - x0 + 1, y1 - y0 + 1), run.dimensions());

    let centered = style.with_position(50.0, 50.0).unwrap();
    let (x0, y0, x1, y1) = ink_bounds(&render_text_layer(&centered, w, h, &fonts)).unwrap();
    let center_x = (x0 + x1 + 1) as f64 / 2.0;
    let center_y = (y0 + y1 + 1) as f64 / 2.0;
    assert!((center_x - w as f64 / 2.0).abs() <= 1.0, "center_x = {center_x}");
    assert!((center_y - h as f64 / 2.0).abs() <= 1.0, "center_y = {center_y}");

    let corner = style.with_position(100.0, 100.0).unwrap();
    let (_, _, x1, y1) = ink_bounds(&render_text_layer(&corner, w, h, &fonts)).unwrap();
    assert_eq!((x1, y1), (w - 1, h - 1));
}

#[test]
fn glyph_height_scales_with_font_size() {
    let Some(fonts) = truetype_fonts() else { return };
    let height = |size: u32| TextRun::layout(&fonts.resolve(size), "EPIC").height() as f64;

    let (h30, h60, h120) = (height(30), height(60), height(120));
    let ratio = h60 / h30;
    assert!((1.8..=2.2).contains(&ratio), "60pt/30pt = {ratio}");
    let ratio = h120 / h60;
    assert!((1.9..=2.1).contains(&ratio), "120pt/60pt = {ratio}");

    // Size is an em size: capitals come out at roughly 0.7 em.
    let cap = h120 / 120.0;
    assert!((0.65..=0.80).contains(&cap), "cap height = {cap} em");
}

#[test]
fn antialiased_run_is_trimmed_to_ink() {
    let Some(fonts) = truetype_fonts() else { return };
    let run = TextRun::layout(&fonts.resolve(60), "EPIC");
    let coverage = run.coverage();
    assert_eq!(coverage.dimensions(), run.dimensions());
    assert_eq!(run.offset(), (0, 0));

    let (w, h) = coverage.dimensions();
    let row_has_ink = |y: u32| (0..w).any(|x| coverage.get_pixel(x, y)[0] > 0);
    let col_has_ink = |x: u32| (0..h).any(|y| coverage.get_pixel(x, y)[0] > 0);
    assert!(row_has_ink(0) && row_has_ink(h - 1));
    assert!(col_has_ink(0) && col_has_ink(w - 1));
    // Edges are antialiased, not just on/off.
    assert!(coverage.pixels().any(|p| p[0] > 0 && p[0] < 255));
}

#[test]
fn largest_size_on_a_tiny_canvas_rasterizes_only_the_visible_part() {
    let Some(fonts) = truetype_fonts() else { return };
    let (canvas, thickness) = ((100, 100), 20);
    let font = fonts.resolve(MAX_FONT_SIZE);

    let run = TextRun::layout_within(&font, "EPIC", |w, h| {
        let origin = placement(canvas, (w, h), 50.0, 50.0);
        visible_window(canvas, (w, h), origin, thickness)
    });
    assert!(run.width() > canvas.0 && run.height() > canvas.1);
    let (cw, ch) = run.coverage().dimensions();
    assert!(cw <= canvas.0 + 2 * thickness, "coverage width {cw}");
    assert!(ch <= canvas.1 + 2 * thickness, "coverage height {ch}");

    let style = TextStyle::new("EPIC", MAX_FONT_SIZE, "purple", 150, 50.0, 50.0, thickness).unwrap();
    let layer = render_text_layer(&style, canvas.0, canvas.1, &fonts);
    assert_eq!(layer.dimensions(), canvas);
}
