//! Immutable text style.

use serde::Serialize;
use textbehind_common::config::StyleDefaults;
use textbehind_common::error::{TextbehindError, TextbehindResult};

use crate::color::{parse_color, Rgb8};

/// Largest accepted font size, in points. Bounds the raster of one glyph.
pub const MAX_FONT_SIZE: u32 = 800;

/// Everything needed to render one caption, already validated.
///
/// Build with [`TextStyle::new`] (or the `with_*` helpers on an existing
/// style); fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    text: String,
    font_size: u32,
    color: Rgb8,
    opacity: u8,
    stroke_thickness: u32,
    x_position: f64,
    y_position: f64,
}

impl TextStyle {
    /// Validate raw parameters and resolve the color string.
    ///
    /// Fails on a font size outside `1..=MAX_FONT_SIZE`, a position outside
    /// `[0, 100]`, or a color string that is neither hex/named nor `rgba(...)`.
    pub fn new(
        text: impl Into<String>,
        font_size: u32,
        color: &str,
        opacity: u8,
        x_position: f64,
        y_position: f64,
        stroke_thickness: u32,
    ) -> TextbehindResult<Self> {
        let color = parse_color(color)?;
        Self::from_parts(
            text.into(),
            font_size,
            color,
            opacity,
            x_position,
            y_position,
            stroke_thickness,
        )
    }

    /// Same as [`TextStyle::new`] with an already resolved color.
    pub fn from_parts(
        text: String,
        font_size: u32,
        color: Rgb8,
        opacity: u8,
        x_position: f64,
        y_position: f64,
        stroke_thickness: u32,
    ) -> TextbehindResult<Self> {
        if font_size == 0 {
            return Err(TextbehindError::invalid_style("font size must be positive"));
        }
        if font_size > MAX_FONT_SIZE {
            return Err(TextbehindError::invalid_style(format!(
                "font size {font_size} exceeds {MAX_FONT_SIZE}"
            )));
        }
        check_position("x", x_position)?;
        check_position("y", y_position)?;

        Ok(Self {
            text,
            font_size,
            color,
            opacity,
            stroke_thickness,
            x_position,
            y_position,
        })
    }

    /// Style for `text` using configured defaults for every other field.
    pub fn from_defaults(text: impl Into<String>, defaults: &StyleDefaults) -> TextbehindResult<Self> {
        Self::new(
            text,
            defaults.font_size,
            &defaults.color,
            defaults.opacity,
            defaults.x_position,
            defaults.y_position,
            defaults.thickness,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size in points.
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn color(&self) -> Rgb8 {
        self.color
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn stroke_thickness(&self) -> u32 {
        self.stroke_thickness
    }

    pub fn x_position(&self) -> f64 {
        self.x_position
    }

    pub fn y_position(&self) -> f64 {
        self.y_position
    }

    /// Ink used for every glyph pixel: the RGB color with opacity as alpha.
    pub fn rgba(&self) -> [u8; 4] {
        self.color.with_alpha(self.opacity)
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_position(&self, x_position: f64, y_position: f64) -> TextbehindResult<Self> {
        check_position("x", x_position)?;
        check_position("y", y_position)?;
        Ok(Self {
            x_position,
            y_position,
            ..self.clone()
        })
    }

    pub fn with_stroke(&self, stroke_thickness: u32) -> Self {
        Self {
            stroke_thickness,
            ..self.clone()
        }
    }
}

fn check_position(axis: &str, value: f64) -> TextbehindResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(TextbehindError::invalid_style(format!(
            "{axis} position {value} outside 0-100"
        )))
    }
}
