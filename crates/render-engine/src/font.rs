//! Font resolution with an ordered fallback chain.
//!
//! 1. The bundled TrueType file at the requested size
//! 2. A common system TrueType file at the requested size
//! 3. The built-in bitmap font, ignoring the requested size
//!
//! Resolution never fails: a missing or unparseable file just moves on to
//! the next tier.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use rusttype::Font;
use textbehind_common::config::FontConfig;

/// How deep below each search directory font files are looked for.
const MAX_SEARCH_DEPTH: usize = 5;

/// Which fallback tier produced a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontTier {
    Bundled,
    System,
    BuiltIn,
}

impl fmt::Display for FontTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontTier::Bundled => "bundled",
            FontTier::System => "system",
            FontTier::BuiltIn => "built-in",
        };
        f.write_str(name)
    }
}

/// The glyph source behind a resolved font.
#[derive(Clone)]
pub enum FontFace {
    TrueType(Font<'static>),
    BuiltIn,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::TrueType(_) => f.write_str("TrueType"),
            FontFace::BuiltIn => f.write_str("BuiltIn"),
        }
    }
}

/// A font ready to lay out text.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub tier: FontTier,
    /// File the face was loaded from (`None` for the built-in font).
    pub path: Option<PathBuf>,
    pub face: FontFace,
    /// Requested size in points. Ignored by the built-in font.
    pub size: u32,
}

impl ResolvedFont {
    /// The built-in bitmap font.
    pub fn built_in(size: u32) -> Self {
        Self {
            tier: FontTier::BuiltIn,
            path: None,
            face: FontFace::BuiltIn,
            size,
        }
    }
}

/// Availability of one tier, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct TierStatus {
    pub tier: FontTier,
    pub file_name: Option<String>,
    pub path: Option<PathBuf>,
    pub usable: bool,
}

/// Resolves fonts according to a [`FontConfig`].
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    config: FontConfig,
}

impl FontResolver {
    pub fn new(config: FontConfig) -> Self {
        Self { config }
    }

    /// A resolver that only ever yields the built-in font.
    pub fn built_in_only() -> Self {
        Self::new(FontConfig {
            bundled_font: String::new(),
            system_font: String::new(),
            search_dirs: Vec::new(),
            install_command: Vec::new(),
        })
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Resolve a font for `size`, walking the fallback chain.
    pub fn resolve(&self, size: u32) -> ResolvedFont {
        let tiers = [
            (FontTier::Bundled, self.config.bundled_font.as_str()),
            (FontTier::System, self.config.system_font.as_str()),
        ];

        for (tier, file_name) in tiers {
            if file_name.is_empty() {
                continue;
            }
            let Some(path) = self.locate(file_name) else {
                tracing::debug!(%tier, file_name, "Font file not found");
                continue;
            };
            match load_truetype(&path) {
                Some(font) => {
                    tracing::debug!(%tier, path = %path.display(), size, "Font resolved");
                    return ResolvedFont {
                        tier,
                        path: Some(path),
                        face: FontFace::TrueType(font),
                        size,
                    };
                }
                None => {
                    tracing::debug!(%tier, path = %path.display(), "Font file unusable");
                }
            }
        }

        tracing::warn!(
            requested_size = size,
            "No TrueType font available, using built-in bitmap font"
        );
        ResolvedFont::built_in(size)
    }

    /// Find `file_name` as given, then anywhere below the search directories.
    pub fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let direct = Path::new(file_name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.config
            .search_dirs
            .iter()
            .find_map(|dir| find_file(dir, file_name, MAX_SEARCH_DEPTH))
    }

    /// Status of every tier, in fallback order.
    pub fn report(&self) -> Vec<TierStatus> {
        let mut statuses = Vec::with_capacity(3);
        for (tier, file_name) in [
            (FontTier::Bundled, &self.config.bundled_font),
            (FontTier::System, &self.config.system_font),
        ] {
            let path = (!file_name.is_empty())
                .then(|| self.locate(file_name))
                .flatten();
            let usable = path.as_deref().and_then(load_truetype).is_some();
            statuses.push(TierStatus {
                tier,
                file_name: (!file_name.is_empty()).then(|| file_name.clone()),
                path,
                usable,
            });
        }
        statuses.push(TierStatus {
            tier: FontTier::BuiltIn,
            file_name: None,
            path: None,
            usable: true,
        });
        statuses
    }
}

fn load_truetype(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

fn find_file(dir: &Path, file_name: &str, depth: usize) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            subdirs.push(path);
        } else if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.eq_ignore_ascii_case(file_name))
        {
            return Some(path);
        }
    }

    if depth == 0 {
        return None;
    }
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, file_name, depth - 1))
}

/// Result of the font provisioning step.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    /// The bundled font already resolves; nothing was done.
    AlreadyAvailable(PathBuf),
    /// The install command ran and the font now resolves.
    Installed(PathBuf),
    /// The font is missing and installation was not requested.
    Missing,
    /// Installation was attempted but the font still does not resolve.
    Failed(String),
}

/// One-time environment setup for the bundled font.
///
/// Idempotent: when the bundled font already resolves, returns immediately.
/// Otherwise runs `install_command` if `install` is set. Never called from
/// the per-image pipeline, and never returns an error; the fallback chain
/// covers whatever is still missing afterwards.
pub fn provision_fonts(config: &FontConfig, install: bool) -> ProvisionOutcome {
    let resolver = FontResolver::new(config.clone());
    if let Some(path) = resolver.locate(&config.bundled_font) {
        if load_truetype(&path).is_some() {
            return ProvisionOutcome::AlreadyAvailable(path);
        }
    }
    if !install {
        return ProvisionOutcome::Missing;
    }

    let Some((program, args)) = config.install_command.split_first() else {
        return ProvisionOutcome::Failed("no install command configured".to_string());
    };

    tracing::info!(%program, ?args, "Installing bundled font");
    let status = Command::new(program).args(args).status();
    match status {
        Ok(status) if status.success() => match resolver.locate(&config.bundled_font) {
            Some(path) => ProvisionOutcome::Installed(path),
            None => ProvisionOutcome::Failed(format!(
                "{program} succeeded but {} is still not found",
                config.bundled_font
            )),
        },
        Ok(status) => ProvisionOutcome::Failed(format!("{program} exited with {status}")),
        Err(e) => ProvisionOutcome::Failed(format!("failed to run {program}: {e}")),
    }
}
