//! One-time font provisioning.

use textbehind_common::config::AppConfig;
use textbehind_render_engine::{provision_fonts, ProvisionOutcome};

pub fn run(config: &AppConfig, install: bool) -> anyhow::Result<()> {
    match provision_fonts(&config.fonts, install) {
        ProvisionOutcome::AlreadyAvailable(path) => {
            println!("Font already available: {}", path.display())
        }
        ProvisionOutcome::Installed(path) => println!("Font installed: {}", path.display()),
        ProvisionOutcome::Missing => {
            println!("{} not found.", config.fonts.bundled_font);
            println!(
                "Re-run with --install to run: {}",
                config.fonts.install_command.join(" ")
            );
        }
        ProvisionOutcome::Failed(reason) => {
            // Not fatal: rendering falls back to other fonts.
            tracing::warn!(%reason, "Font provisioning failed");
            println!("Could not install font automatically: {reason}");
            println!("Please install {} manually.", config.fonts.bundled_font);
        }
    }
    Ok(())
}
