//! Color inputs and their canonical RGB form.
//!
//! Callers hand us color strings in two shapes: a hex code or color name,
//! or a functional `rgba(r, g, b, a)` string. Both resolve to an [`Rgb8`];
//! any alpha carried by the string is dropped because text opacity is set
//! separately.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use textbehind_common::error::{TextbehindError, TextbehindResult};

use crate::named;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color with the given alpha appended.
    pub fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// A color string as received at the boundary, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorInput {
    /// `#rgb`, `#rrggbb`, `#rrggbbaa`, or a named color.
    HexOrNamed(String),
    /// Functional `rgb(...)` / `rgba(...)` form. `a` is kept only for display.
    Rgba { r: f64, g: f64, b: f64, a: f64 },
}

impl ColorInput {
    /// Resolve to a canonical RGB triple. Embedded alpha is always discarded.
    pub fn resolve(&self) -> TextbehindResult<Rgb8> {
        match self {
            ColorInput::HexOrNamed(s) => resolve_hex_or_named(s),
            ColorInput::Rgba { r, g, b, .. } => {
                let channel = |v: f64| -> TextbehindResult<u8> {
                    let v = v.trunc();
                    if v.is_finite() && (0.0..=255.0).contains(&v) {
                        Ok(v as u8)
                    } else {
                        Err(TextbehindError::invalid_color(
                            self.to_string(),
                            format!("channel {v} outside 0-255"),
                        ))
                    }
                };
                Ok(Rgb8::new(channel(*r)?, channel(*g)?, channel(*b)?))
            }
        }
    }
}

impl fmt::Display for ColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorInput::HexOrNamed(s) => f.write_str(s),
            ColorInput::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

impl FromStr for ColorInput {
    type Err = TextbehindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("));

        let Some(inner) = inner else {
            return Ok(ColorInput::HexOrNamed(trimmed.to_string()));
        };

        let inner = inner
            .strip_suffix(')')
            .ok_or_else(|| TextbehindError::invalid_color(s, "missing closing parenthesis"))?;

        let mut values = Vec::with_capacity(4);
        for part in inner.split(',') {
            let part = part.trim();
            let value = part.parse::<f64>().map_err(|_| {
                TextbehindError::invalid_color(s, format!("component {part:?} is not a number"))
            })?;
            values.push(value);
        }

        match values.as_slice() {
            [r, g, b] => Ok(ColorInput::Rgba {
                r: *r,
                g: *g,
                b: *b,
                a: 1.0,
            }),
            [r, g, b, a] => Ok(ColorInput::Rgba {
                r: *r,
                g: *g,
                b: *b,
                a: *a,
            }),
            _ => Err(TextbehindError::invalid_color(
                s,
                format!("expected 3 or 4 components, got {}", values.len()),
            )),
        }
    }
}

/// Parse and resolve a color string in one step.
pub fn parse_color(s: &str) -> TextbehindResult<Rgb8> {
    s.parse::<ColorInput>()?.resolve()
}

fn resolve_hex_or_named(s: &str) -> TextbehindResult<Rgb8> {
    let Some(digits) = s.strip_prefix('#') else {
        return named::lookup(s)
            .map(Rgb8::from)
            .ok_or_else(|| TextbehindError::invalid_color(s, "unknown color name"));
    };

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TextbehindError::invalid_color(s, "non-hex digit"));
    }

    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or(0);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);

    match digits.len() {
        3 | 4 => Ok(Rgb8::new(nibble(0) * 17, nibble(1) * 17, nibble(2) * 17)),
        6 | 8 => Ok(Rgb8::new(byte(0), byte(2), byte(4))),
        n => Err(TextbehindError::invalid_color(
            s,
            format!("expected 3, 4, 6 or 8 hex digits, got {n}"),
        )),
    }
}
