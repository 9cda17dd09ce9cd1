//! Layer compositor: base image, text layer, foreground cutout.
//!
//! Layers stack bottom to top; every layer must match the base image's
//! dimensions exactly.
//!
//! ```text
//! cutout (RGBA) ─────────────────┐
//! text layer (RGBA) ──┐          ├── paste, cutout alpha as mask ──▶ result (RGB)
//! base (RGB) ─────────┴── over ──┘
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use textbehind_common::error::{TextbehindError, TextbehindResult};

/// Steps 1 and 2: blend the text layer over the opaque base.
///
/// The result is plain RGB, so no residual alpha survives.
pub fn flatten_text(base: &RgbImage, text: &RgbaImage) -> TextbehindResult<RgbImage> {
    blend_layer(base, text)
}

/// Step 3: paste the cutout over `base`, using its own alpha as the mask.
///
/// A fully transparent cutout leaves `base` unchanged; a fully opaque one
/// replaces it.
pub fn paste_cutout(base: &RgbImage, cutout: &RgbaImage) -> TextbehindResult<RgbImage> {
    blend_layer(base, cutout)
}

/// Run all three compositing steps.
pub fn composite(
    base: &RgbImage,
    text: &RgbaImage,
    cutout: &RgbaImage,
) -> TextbehindResult<RgbImage> {
    let text_behind = flatten_text(base, text)?;
    paste_cutout(&text_behind, cutout)
}

fn blend_layer(base: &RgbImage, layer: &RgbaImage) -> TextbehindResult<RgbImage> {
    if base.dimensions() != layer.dimensions() {
        return Err(TextbehindError::dimension_mismatch(
            base.dimensions(),
            layer.dimensions(),
        ));
    }

    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
        *dst = over(*dst, *src);
    }
    Ok(out)
}

/// "Over" onto an opaque destination: `src·a + dst·(1 − a)` per channel.
/// Exact at `a = 0` and `a = 255`.
pub fn over(dst: Rgb<u8>, src: Rgba<u8>) -> Rgb<u8> {
    let a = src[3] as u32;
    match a {
        0 => dst,
        255 => Rgb([src[0], src[1], src[2]]),
        _ => {
            let blend =
                |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            Rgb([
                blend(src[0], dst[0]),
                blend(src[1], dst[1]),
                blend(src[2], dst[2]),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([250, 240, 230])
            } else {
                Rgb([10, 20, 30])
            }
        })
    }

    #[test]
    fn test_over_extremes() {
        let dst = Rgb([10, 20, 30]);
        assert_eq!(over(dst, Rgba([200, 100, 0, 0])), dst);
        assert_eq!(over(dst, Rgba([200, 100, 0, 255])), Rgb([200, 100, 0]));
    }

    #[test]
    fn test_over_half_alpha() {
        let out = over(Rgb([0, 0, 0]), Rgba([255, 255, 255, 128]));
        assert_eq!(out, Rgb([128, 128, 128]));
        let out = over(Rgb([255, 255, 255]), Rgba([0, 0, 0, 100]));
        assert_eq!(out, Rgb([155, 155, 155]));
    }

    #[test]
    fn test_transparent_cutout_keeps_text_composite() {
        let base = checker(8, 6);
        let mut text = RgbaImage::new(8, 6);
        text.put_pixel(3, 3, Rgba([255, 0, 0, 255]));
        text.put_pixel(4, 3, Rgba([0, 0, 255, 90]));

        let behind = flatten_text(&base, &text).unwrap();
        let cutout = RgbaImage::from_pixel(8, 6, Rgba([9, 9, 9, 0]));
        let out = composite(&base, &text, &cutout).unwrap();
        assert_eq!(out, behind);
        assert_eq!(*out.get_pixel(3, 3), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_opaque_cutout_hides_text() {
        let base = checker(5, 5);
        let text = RgbaImage::from_pixel(5, 5, Rgba([255, 0, 0, 255]));
        let cutout = RgbaImage::from_fn(5, 5, |x, y| Rgba([x as u8, y as u8, 7, 255]));

        let out = composite(&base, &text, &cutout).unwrap();
        for (x, y, px) in out.enumerate_pixels() {
            assert_eq!(*px, Rgb([x as u8, y as u8, 7]));
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let base = RgbImage::new(4, 4);
        let err = flatten_text(&base, &RgbaImage::new(4, 5)).unwrap_err();
        assert!(matches!(err, TextbehindError::DimensionMismatch { .. }));
        assert!(paste_cutout(&base, &RgbaImage::new(3, 4)).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_over_stays_between_endpoints(
            dst in proptest::array::uniform3(0u8..=255),
            src in proptest::array::uniform4(0u8..=255),
        ) {
            let out = over(Rgb(dst), Rgba(src));
            for c in 0..3 {
                let lo = dst[c].min(src[c]);
                let hi = dst[c].max(src[c]);
                proptest::prop_assert!(out[c] >= lo && out[c] <= hi);
            }
        }
    }
}
