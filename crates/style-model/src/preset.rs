//! Pre-seeded sample invocations.

use serde::Serialize;
use textbehind_common::error::TextbehindResult;

use crate::style::TextStyle;

/// A named parameter set paired with the image it was made for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    /// File name of the sample image the preset was tuned for.
    pub image: &'static str,
    pub text: &'static str,
    pub font_size: u32,
    pub color: &'static str,
    pub opacity: u8,
    pub x_position: f64,
    pub y_position: f64,
    pub thickness: u32,
}

const PRESETS: [Preset; 3] = [
    Preset {
        name: "epic",
        image: "pink_convertible.webp",
        text: "EPIC",
        font_size: 420,
        color: "#800080",
        opacity: 150,
        x_position: 50.0,
        y_position: 21.0,
        thickness: 9,
    },
    Preset {
        name: "pear",
        image: "pear.jpg",
        text: "PEAR",
        font_size: 350,
        color: "#000000",
        opacity: 100,
        x_position: 50.0,
        y_position: 2.0,
        thickness: 5,
    },
    Preset {
        name: "life",
        image: "sample_text_image.jpeg",
        text: "LIFE",
        font_size: 400,
        color: "#000000",
        opacity: 150,
        x_position: 50.0,
        y_position: 2.0,
        thickness: 8,
    },
];

impl Preset {
    pub fn all() -> &'static [Preset] {
        &PRESETS
    }

    /// Find a preset by name, ignoring ASCII case.
    pub fn find(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn style(&self) -> TextbehindResult<TextStyle> {
        TextStyle::new(
            self.text,
            self.font_size,
            self.color,
            self.opacity,
            self.x_position,
            self.y_position,
            self.thickness,
        )
    }
}
