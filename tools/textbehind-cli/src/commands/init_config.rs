//! Write the default configuration file.

use std::path::PathBuf;

use textbehind_common::config::{config_file_path, AppConfig};

pub fn run(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    AppConfig::default()
        .save_to(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Config written: {}", path.display());
    Ok(())
}
