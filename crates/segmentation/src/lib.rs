//! Textbehind Segmentation
//!
//! The foreground extractor is an external collaborator: given an opaque RGB
//! image it returns an image of the same size whose alpha channel separates
//! the subject (opaque) from the background (transparent). This crate holds
//! the contract and the byte-stream plumbing around it; the actual model
//! lives behind a backend.
//!
//! ```text
//! RgbImage ──encode──▶ PNG bytes ──backend──▶ PNG bytes ──decode──▶ RgbaImage
//!                                                         (same width × height)
//! ```

pub mod command;
pub mod file;

use std::io::Cursor;

use image::{ImageFormat, RgbImage, RgbaImage};
use textbehind_common::error::{TextbehindError, TextbehindResult};

pub use command::CommandExtractor;
pub use file::CutoutFileExtractor;

/// Abstract interface for background-removal providers.
pub trait ForegroundExtractor: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Whether the backend can run in this environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Byte-level contract: PNG in, PNG (or any decodable format) with alpha out.
    fn remove_background(&self, png: &[u8]) -> TextbehindResult<Vec<u8>>;

    /// Produce the cutout for `image`.
    ///
    /// Fails if the backend fails, if its output cannot be decoded, or if the
    /// decoded cutout does not match the input dimensions. Never retries.
    fn extract(&self, image: &RgbImage) -> TextbehindResult<RgbaImage> {
        let png = encode_png(image)?;
        tracing::debug!(
            backend = self.name(),
            width = image.width(),
            height = image.height(),
            bytes = png.len(),
            "Requesting foreground cutout"
        );

        let output = self.remove_background(&png)?;
        let cutout = decode_cutout(&output)?;

        let expected = image.dimensions();
        let actual = cutout.dimensions();
        if expected != actual {
            return Err(TextbehindError::dimension_mismatch(expected, actual));
        }

        tracing::debug!(backend = self.name(), bytes = output.len(), "Cutout received");
        Ok(cutout)
    }
}

impl<T: ForegroundExtractor + ?Sized> ForegroundExtractor for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn remove_background(&self, png: &[u8]) -> TextbehindResult<Vec<u8>> {
        (**self).remove_background(png)
    }

    fn extract(&self, image: &RgbImage) -> TextbehindResult<RgbaImage> {
        (**self).extract(image)
    }
}

/// Serialize an RGB image as a lossless PNG byte stream.
pub fn encode_png(image: &RgbImage) -> TextbehindResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Decode backend output into RGBA. Images without alpha become fully opaque.
pub fn decode_cutout(bytes: &[u8]) -> TextbehindResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(TextbehindError::segmentation("extractor returned no data"));
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        TextbehindError::segmentation(format!("cannot decode extractor output: {e}"))
    })?;
    Ok(decoded.to_rgba8())
}
