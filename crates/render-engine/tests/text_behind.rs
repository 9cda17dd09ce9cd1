use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use textbehind_common::config::AppConfig;
use textbehind_common::error::{TextbehindError, TextbehindResult};
use textbehind_render_engine::compositor::flatten_text;
use textbehind_render_engine::{
    process, render_text_layer, FontResolver, TextBehindPipeline, TextRun,
};
use textbehind_segmentation::ForegroundExtractor;
use textbehind_style_model::{Preset, TextStyle};

const BACKGROUND: Rgb<u8> = Rgb([40, 160, 60]);
const SUBJECT: Rgb<u8> = Rgb([230, 200, 40]);

/// Subject is every pixel that is not the flat background color.
struct KeyedExtractor;

impl ForegroundExtractor for KeyedExtractor {
    fn name(&self) -> &str {
        "keyed"
    }

    fn remove_background(&self, png: &[u8]) -> TextbehindResult<Vec<u8>> {
        let rgb = image::load_from_memory(png)?.to_rgb8();
        let cutout = RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let p = rgb.get_pixel(x, y);
            let alpha = if *p == BACKGROUND { 0 } else { 255 };
            Rgba([p[0], p[1], p[2], alpha])
        });
        encode(&cutout)
    }
}

/// Returns the input with a constant alpha everywhere.
struct ConstantAlpha(u8);

impl ForegroundExtractor for ConstantAlpha {
    fn name(&self) -> &str {
        "constant-alpha"
    }

    fn remove_background(&self, png: &[u8]) -> TextbehindResult<Vec<u8>> {
        let mut rgba = image::load_from_memory(png)?.to_rgba8();
        for px in rgba.pixels_mut() {
            px[3] = self.0;
        }
        encode(&rgba)
    }
}

fn encode(image: &RgbaImage) -> TextbehindResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// A flat background with an elliptical subject in the middle.
fn pear_like(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    draw_filled_ellipse_mut(
        &mut img,
        ((width / 2) as i32, (height / 2) as i32),
        (width / 6) as i32,
        (height / 3) as i32,
        SUBJECT,
    );
    img
}

fn built_in_pipeline(extractor: impl ForegroundExtractor + 'static) -> TextBehindPipeline {
    TextBehindPipeline::new(Box::new(extractor), FontResolver::built_in_only())
}

fn default_font_pipeline(extractor: impl ForegroundExtractor + 'static) -> TextBehindPipeline {
    TextBehindPipeline::new(
        Box::new(extractor),
        FontResolver::new(AppConfig::default().fonts),
    )
}

/// Bounding box `(x0, y0, x1, y1)` of pixels with any alpha.
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
fn output_dimensions_match_input() {
    let pipeline = built_in_pipeline(KeyedExtractor);
    for (w, h) in [(1, 1), (17, 9), (64, 64), (200, 37)] {
        for (x, y) in [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (33.0, 91.0)] {
            let style = TextStyle::new("Hello", 40, "#112233", 200, x, y, 1).unwrap();
            let input = DynamicImage::ImageRgb8(pear_like(w, h));
            let out = pipeline.process(Some(&input), &style).unwrap().unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }
}

#[test]
fn centered_text_sits_in_the_middle() {
    let fonts = FontResolver::built_in_only();
    let style = TextStyle::new("MID", 10, "white", 255, 50.0, 50.0, 0).unwrap();
    let run = TextRun::layout(&fonts.resolve(10), style.text());
    let (w, h) = (121, 80);

    let layer = render_text_layer(&style, w, h, &fonts);
    let (x0, y0, x1, y1) = ink_bounds(&layer).unwrap();
    assert_eq!((x1 - x0 + 1, y1 - y0 + 1), run.dimensions());

    let center_x = (x0 + x1 + 1) as f64 / 2.0;
    let center_y = (y0 + y1 + 1) as f64 / 2.0;
    assert!((center_x - w as f64 / 2.0).abs() <= 1.0, "center_x = {center_x}");
    assert!((center_y - h as f64 / 2.0).abs() <= 1.0, "center_y = {center_y}");
}

#[test]
fn zero_and_hundred_align_to_edges() {
    let fonts = FontResolver::built_in_only();
    let (w, h) = (90, 50);

    let top_left = TextStyle::new("AB", 10, "white", 255, 0.0, 0.0, 0).unwrap();
    let (x0, y0, _, _) = ink_bounds(&render_text_layer(&top_left, w, h, &fonts)).unwrap();
    assert_eq!((x0, y0), (0, 0));

    let bottom_right = top_left.with_position(100.0, 100.0).unwrap();
    let (_, _, x1, y1) = ink_bounds(&render_text_layer(&bottom_right, w, h, &fonts)).unwrap();
    assert_eq!((x1, y1), (w - 1, h - 1));
}

#[test]
fn transparent_cutout_keeps_text_over_base() {
    let base = pear_like(80, 60);
    let style = TextStyle::new("TEXT", 20, "#ff00ff", 180, 50.0, 50.0, 1).unwrap();
    let fonts = FontResolver::built_in_only();
    let expected = flatten_text(&base, &render_text_layer(&style, 80, 60, &fonts)).unwrap();

    let pipeline = built_in_pipeline(ConstantAlpha(0));
    let out = pipeline.process_rgb(&base, &style).unwrap();
    assert_eq!(out, expected);
    assert_ne!(out, base);
}

#[test]
fn opaque_cutout_hides_text_entirely() {
    let base = pear_like(80, 60);
    let style = TextStyle::new("TEXT", 20, "#ff00ff", 255, 50.0, 50.0, 2).unwrap();

    let pipeline = built_in_pipeline(ConstantAlpha(255));
    let out = pipeline.process_rgb(&base, &style).unwrap();
    assert_eq!(out, base);
}

#[test]
fn subject_stays_in_front_of_text() {
    let base = pear_like(120, 90);
    // Big stroke so the text covers the subject's center.
    let style = TextStyle::new("WWWWWWWWWW", 10, "#000000", 255, 50.0, 50.0, 6).unwrap();
    let pipeline = built_in_pipeline(KeyedExtractor);
    let out = pipeline.process_rgb(&base, &style).unwrap();

    assert_eq!(*out.get_pixel(60, 45), SUBJECT);
    let darkened = out
        .enumerate_pixels()
        .filter(|(x, y, p)| *base.get_pixel(*x, *y) == BACKGROUND && p.0 == [0, 0, 0])
        .count();
    assert!(darkened > 0, "text should show through the background");
}

#[test]
fn oversized_epic_text_does_not_crash() {
    let input = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
    let style = Preset::find("epic").unwrap().style().unwrap();
    assert_eq!(style.font_size(), 420);

    let pipeline = default_font_pipeline(ConstantAlpha(0));
    let out = pipeline.process(Some(&input), &style).unwrap().unwrap();
    assert_eq!(out.dimensions(), (100, 100));
}

#[test]
fn huge_font_size_is_an_error_not_an_abort() {
    let input = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
    let pipeline = default_font_pipeline(ConstantAlpha(0));

    let err = process(&pipeline, Some(&input), "EPIC", 60_000, "#000", 255, 50.0, 50.0, 0)
        .unwrap_err();
    assert!(matches!(err, TextbehindError::InvalidStyle { .. }));
}

#[test]
fn pear_scenario_produces_opaque_rgb() {
    let input = DynamicImage::ImageRgb8(pear_like(320, 240));
    let pipeline = default_font_pipeline(KeyedExtractor);

    let out = process(
        &pipeline,
        Some(&input),
        "PEAR",
        350,
        "#000000",
        100,
        50.0,
        50.0,
        2,
    )
    .unwrap()
    .expect("an image was supplied");

    assert_eq!(out.dimensions(), (320, 240));
    let dynamic = DynamicImage::ImageRgb8(out);
    assert_eq!(dynamic.color().channel_count(), 3);
}

#[test]
fn rgba_input_is_flattened_to_rgb() {
    let rgba = RgbaImage::from_pixel(12, 12, Rgba([10, 20, 30, 0]));
    let input = DynamicImage::ImageRgba8(rgba);
    let style = TextStyle::new("", 10, "#fff", 255, 50.0, 50.0, 0).unwrap();

    let pipeline = built_in_pipeline(ConstantAlpha(0));
    let out = pipeline.process(Some(&input), &style).unwrap().unwrap();
    assert!(out.pixels().all(|p| p.0 == [10, 20, 30]));
}

#[test]
fn no_input_returns_nothing() {
    let pipeline = built_in_pipeline(KeyedExtractor);
    let out = process(&pipeline, None, "PEAR", 350, "#000000", 100, 50.0, 50.0, 2).unwrap();
    assert!(out.is_none());
}

#[test]
fn concurrent_invocations_are_independent() {
    let pipeline = built_in_pipeline(KeyedExtractor);
    let expected = {
        let style = TextStyle::new("SAME", 10, "navy", 220, 25.0, 75.0, 1).unwrap();
        pipeline.process_rgb(&pear_like(90, 70), &style).unwrap()
    };

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let style = TextStyle::new("SAME", 10, "navy", 220, 25.0, 75.0, 1).unwrap();
                    pipeline.process_rgb(&pear_like(90, 70), &style).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
