//! Precomputed cutout backend.

use std::path::{Path, PathBuf};

use textbehind_common::error::{TextbehindError, TextbehindResult};

use crate::ForegroundExtractor;

/// Serves a cutout that was produced ahead of time by some other tool.
///
/// The input bytes are ignored; the dimension check in
/// [`ForegroundExtractor::extract`] still guards against a cutout made for a
/// different image.
#[derive(Debug, Clone)]
pub struct CutoutFileExtractor {
    path: PathBuf,
}

impl CutoutFileExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ForegroundExtractor for CutoutFileExtractor {
    fn name(&self) -> &str {
        "cutout-file"
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn remove_background(&self, _png: &[u8]) -> TextbehindResult<Vec<u8>> {
        if !self.path.exists() {
            return Err(TextbehindError::FileNotFound {
                path: self.path.clone(),
            });
        }
        Ok(std::fs::read(&self.path)?)
    }
}
