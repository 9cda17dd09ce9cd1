//! Error types shared across textbehind crates.

use std::path::PathBuf;

/// Top-level error type for textbehind operations.
#[derive(Debug, thiserror::Error)]
pub enum TextbehindError {
    #[error("Segmentation error: {message}")]
    Segmentation { message: String },

    #[error("Invalid color {input:?}: {reason}")]
    InvalidColor { input: String, reason: String },

    #[error("Invalid text style: {message}")]
    InvalidStyle { message: String },

    #[error(
        "Dimension mismatch: expected {}x{}, got {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TextbehindError.
pub type TextbehindResult<T> = Result<T, TextbehindError>;

impl TextbehindError {
    pub fn segmentation(msg: impl Into<String>) -> Self {
        Self::Segmentation {
            message: msg.into(),
        }
    }

    pub fn invalid_color(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_style(msg: impl Into<String>) -> Self {
        Self::InvalidStyle {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Build a dimension mismatch from `(width, height)` pairs.
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
