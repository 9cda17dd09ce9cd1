//! Textbehind Render Engine
//!
//! Puts a caption between an image's background and its subject.
//!
//! # Pipeline Architecture
//!
//! ```text
//! input image ──┬── to RGB ──────────────────────┐
//!               │                                ├── text over base (opaque)
//! style ────────┼── fonts ── text layer (RGBA) ──┘            │
//!               │                                             ├── paste cutout
//!               └── extractor ── cutout (RGBA) ───────────────┘        │
//!                                                                      ▼
//!                                                               result (RGB)
//! ```

pub mod bitmap_font;
pub mod compositor;
pub mod font;
pub mod pipeline;
pub mod text_layer;

pub use font::{provision_fonts, FontResolver, FontTier, ProvisionOutcome, ResolvedFont};
pub use pipeline::{process, TextBehindPipeline};
pub use text_layer::{
    draw_stroked, placement, render_text_layer, visible_window, InkWindow, TextRun, TextSink,
};
