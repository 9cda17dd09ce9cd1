//! Check fonts and extractor availability.

use textbehind_common::config::AppConfig;
use textbehind_render_engine::{FontTier, TextBehindPipeline};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("textbehind System Check");
    println!("{}", "=".repeat(50));

    // Inspect exactly what `render` would run with.
    let pipeline = TextBehindPipeline::from_config(config);
    let resolver = pipeline.fonts();
    let report = resolver.report();
    for status in &report {
        let label = status.file_name.as_deref().unwrap_or("5x7 bitmap");
        match (&status.path, status.usable) {
            (_, true) if status.tier == FontTier::BuiltIn => {
                println!("[OK] Font ({}): {label}", status.tier)
            }
            (Some(path), true) => {
                println!("[OK] Font ({}): {label} at {}", status.tier, path.display())
            }
            (Some(path), false) => println!(
                "[WARN] Font ({}): {label} at {} could not be parsed",
                status.tier,
                path.display()
            ),
            (None, _) => println!("[WARN] Font ({}): {label} not found", status.tier),
        }
    }
    let active = resolver.resolve(config.defaults.font_size);
    println!("     Text will render with the {} font", active.tier);

    let extractor = pipeline.extractor();
    println!();
    if extractor.is_available() {
        println!("[OK] Extractor: {}", extractor.name());
        println!();
        println!("All required capabilities are available. textbehind is ready.");
    } else {
        println!("[MISSING] Extractor: {}", extractor.name());
        println!("     Install it (e.g. `pip install rembg[cli]`) or use `render --cutout`.");
        println!();
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
