//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TextbehindError, TextbehindResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Font lookup and provisioning.
    pub fonts: FontConfig,

    /// External background-removal command.
    pub extractor: ExtractorConfig,

    /// Style values used when a caller leaves a parameter unset.
    pub defaults: StyleDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Font file names and the directories searched for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// First-choice TrueType file name, shipped with the application.
    pub bundled_font: String,

    /// Common system TrueType file name, tried second.
    pub system_font: String,

    /// Directories searched recursively for the font file names, after the
    /// name itself is tried relative to the working directory.
    pub search_dirs: Vec<PathBuf>,

    /// Command used by provisioning to install the bundled font.
    pub install_command: Vec<String>,
}

/// External program that turns a PNG on stdin into a cutout PNG on stdout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractorConfig {
    pub program: String,
    pub args: Vec<String>,
}

/// Default style parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleDefaults {
    /// Font size in points.
    pub font_size: u32,

    /// Stroke thickness in pixels.
    pub thickness: u32,

    /// Color string (hex, named, or `rgba(...)`).
    pub color: String,

    /// Text opacity, 0 (invisible) to 255 (opaque).
    pub opacity: u8,

    /// Horizontal position, percent of the free room.
    pub x_position: f64,

    /// Vertical position, percent of the free room.
    pub y_position: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "textbehind=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bundled_font: "DejaVuSans.ttf".to_string(),
            system_font: "arial.ttf".to_string(),
            search_dirs: default_font_dirs(),
            install_command: vec![
                "apt-get".to_string(),
                "install".to_string(),
                "-y".to_string(),
                "fonts-dejavu".to_string(),
            ],
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: "rembg".to_string(),
            args: vec!["i".to_string(), "-".to_string(), "-".to_string()],
        }
    }
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_size: 400,
            thickness: 0,
            color: "#FFFFFF".to_string(),
            opacity: 255,
            x_position: 50.0,
            y_position: 50.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], errors are returned.
    pub fn load_from(path: &Path) -> TextbehindResult<Self> {
        if !path.exists() {
            return Err(TextbehindError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TextbehindError::config(format!("{}: {e}", path.display())))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> TextbehindResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> TextbehindResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("textbehind").join("config.json")
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
}

/// Default font search directories, most specific first.
fn default_font_dirs() -> Vec<PathBuf> {
    let home = home_dir();
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".local").join("share"));

    let mut dirs = vec![
        data_home.join("fonts"),
        home.join(".fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
    ];
    let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
    dirs.push(PathBuf::from(windir).join("Fonts"));
    dirs
}
