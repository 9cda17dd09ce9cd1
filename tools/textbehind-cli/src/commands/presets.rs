//! List the sample presets.

use textbehind_style_model::Preset;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(Preset::all())?);
        return Ok(());
    }

    for p in Preset::all() {
        println!("{} ({})", p.name, p.image);
        println!(
            "  text: {:?}  size: {}  color: {}  opacity: {}",
            p.text, p.font_size, p.color, p.opacity
        );
        println!(
            "  position: {}%, {}%  thickness: {}",
            p.x_position, p.y_position, p.thickness
        );
    }
    Ok(())
}
