//! Textbehind Style Model
//!
//! Defines the value types a caption is described with:
//! - **Color:** Closed color input type resolved once into an RGB triple
//! - **Style:** Immutable text style (size, color, opacity, stroke, position)
//! - **Presets:** The pre-seeded sample parameter sets
//!
//! Positions are percentages `[0, 100]` of the room left over after the
//! text is measured, not of the canvas itself.

pub mod color;
mod named;
pub mod preset;
pub mod style;

pub use color::*;
pub use preset::*;
pub use style::*;
