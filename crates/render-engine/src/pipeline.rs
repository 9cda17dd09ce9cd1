//! The text-behind-subject pipeline.
//!
//! One call takes one image and one style and returns one image; nothing
//! is shared between calls beyond the read-only extractor and font config.

use image::{DynamicImage, RgbImage};
use textbehind_common::config::AppConfig;
use textbehind_common::error::TextbehindResult;
use textbehind_segmentation::{CommandExtractor, ForegroundExtractor};
use textbehind_style_model::TextStyle;

use crate::compositor;
use crate::font::FontResolver;
use crate::text_layer::render_text_layer;

pub struct TextBehindPipeline {
    extractor: Box<dyn ForegroundExtractor>,
    fonts: FontResolver,
}

impl TextBehindPipeline {
    pub fn new(extractor: Box<dyn ForegroundExtractor>, fonts: FontResolver) -> Self {
        Self { extractor, fonts }
    }

    /// Pipeline using the configured extractor command and font settings.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(CommandExtractor::from_config(&config.extractor)),
            FontResolver::new(config.fonts.clone()),
        )
    }

    pub fn extractor(&self) -> &dyn ForegroundExtractor {
        self.extractor.as_ref()
    }

    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// Place the caption behind the subject of `image`.
    ///
    /// No image means nothing to do: returns `Ok(None)` without touching the
    /// extractor. Extractor failures propagate unchanged.
    pub fn process(
        &self,
        image: Option<&DynamicImage>,
        style: &TextStyle,
    ) -> TextbehindResult<Option<RgbImage>> {
        let Some(image) = image else {
            tracing::debug!("No input image, skipping");
            return Ok(None);
        };
        // Any input transparency is dropped; the base is always opaque RGB.
        let base = image.to_rgb8();
        self.process_rgb(&base, style).map(Some)
    }

    /// [`TextBehindPipeline::process`] for an image that is already RGB.
    pub fn process_rgb(&self, base: &RgbImage, style: &TextStyle) -> TextbehindResult<RgbImage> {
        let (width, height) = base.dimensions();
        tracing::debug!(
            width,
            height,
            extractor = self.extractor.name(),
            text = style.text(),
            "Processing image"
        );

        let cutout = self.extractor.extract(base)?;
        let text_layer = render_text_layer(style, width, height, &self.fonts);
        let result = compositor::composite(base, &text_layer, &cutout)?;

        tracing::debug!(width, height, "Composite complete");
        Ok(result)
    }
}

/// Scalar-parameter entry point.
///
/// Returns `Ok(None)` when `image` is `None`, before any parameter is
/// looked at. A malformed color or out-of-range style value is an error.
#[allow(clippy::too_many_arguments)]
pub fn process(
    pipeline: &TextBehindPipeline,
    image: Option<&DynamicImage>,
    text: &str,
    font_size: u32,
    color: &str,
    opacity: u8,
    x_position: f64,
    y_position: f64,
    stroke_thickness: u32,
) -> TextbehindResult<Option<RgbImage>> {
    if image.is_none() {
        return Ok(None);
    }
    let style = TextStyle::new(
        text,
        font_size,
        color,
        opacity,
        x_position,
        y_position,
        stroke_thickness,
    )?;
    pipeline.process(image, &style)
}
