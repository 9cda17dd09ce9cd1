//! External-process backend.
//!
//! Runs a background-removal program that reads a PNG on stdin and writes
//! the cutout to stdout, e.g. `rembg i - -`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use textbehind_common::config::ExtractorConfig;
use textbehind_common::error::{TextbehindError, TextbehindResult};

use crate::ForegroundExtractor;

#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl ForegroundExtractor for CommandExtractor {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        command_exists(&self.program)
    }

    fn remove_background(&self, png: &[u8]) -> TextbehindResult<Vec<u8>> {
        tracing::debug!(program = %self.program, args = ?self.args, "Running extractor");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TextbehindError::segmentation(format!("Failed to start {}: {e}", self.program))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TextbehindError::segmentation("Failed to open extractor stdin"))?;

        // Feed stdin from its own thread so a full stdout pipe cannot deadlock us.
        let input = png.to_vec();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            stdin.write_all(&input)?;
            stdin.flush()
        });

        let output = child.wait_with_output().map_err(|e| {
            TextbehindError::segmentation(format!("Failed to wait on {}: {e}", self.program))
        })?;

        let write_result = writer
            .join()
            .map_err(|_| TextbehindError::segmentation("extractor stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextbehindError::segmentation(format!(
                "{} failed (status {}): {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        // A closed pipe is fine when the program finished successfully.
        if let Err(e) = write_result {
            tracing::debug!(error = %e, "Extractor closed stdin early");
        }

        if output.stdout.is_empty() {
            return Err(TextbehindError::segmentation(format!(
                "{} produced no output",
                self.program
            )));
        }

        Ok(output.stdout)
    }
}

/// Whether `binary` names an executable: a path is checked as given, a bare
/// name is looked up in each `PATH` entry. Nothing is spawned.
pub fn command_exists(binary: &str) -> bool {
    if binary.is_empty() {
        return false;
    }
    let path = Path::new(binary);
    if path.components().count() > 1 {
        return is_executable(path);
    }
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                let candidate = dir.join(binary);
                is_executable(&candidate)
                    || (cfg!(windows) && is_executable(&candidate.with_extension("exe")))
            })
        })
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_cat_acts_as_identity_extractor() {
        let extractor = CommandExtractor::new("cat", vec![]);
        assert!(extractor.is_available());

        let image = RgbImage::from_pixel(6, 4, Rgb([200, 100, 50]));
        let cutout = extractor.extract(&image).unwrap();
        assert_eq!(cutout.dimensions(), (6, 4));
        assert_eq!(cutout.get_pixel(0, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn test_command_exists_scans_path_without_a_shell() {
        assert!(command_exists("sh"));
        assert!(command_exists("/bin/sh"));
        assert!(!command_exists(""));
        assert!(!command_exists("/definitely/not/here"));

        let marker = std::env::temp_dir().join(format!("textbehind-cmd-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);
        let hostile = format!("sh; touch {}", marker.display());
        assert!(!command_exists(&hostile));
        assert!(!command_exists("$(true)"));
        assert!(!marker.exists());
    }

    #[test]
    fn test_command_exists_requires_execute_bit() {
        let dir = std::env::temp_dir().join(format!("textbehind-noexec-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let plain = dir.join("remover");
        std::fs::write(&plain, b"#!/bin/sh\n").unwrap();
        assert!(!command_exists(plain.to_str().unwrap()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_program_is_segmentation_error() {
        let extractor = CommandExtractor::new("textbehind-no-such-binary", vec![]);
        assert!(!extractor.is_available());
        let err = extractor.remove_background(b"png").unwrap_err();
        assert!(matches!(err, TextbehindError::Segmentation { .. }));
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let extractor = CommandExtractor::new(
            "sh",
            vec!["-c".to_string(), "echo 'no model' >&2; exit 3".to_string()],
        );
        let err = extractor.remove_background(b"png").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no model"), "{message}");
    }

    #[test]
    fn test_empty_output_is_error() {
        let extractor = CommandExtractor::new("true", vec![]);
        let err = extractor.remove_background(b"png").unwrap_err();
        assert!(err.to_string().contains("no output"));
    }
}
