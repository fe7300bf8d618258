use anyhow::{Result, anyhow};
use wavedrift_core::Theme;

pub fn run(theme: Option<&str>) -> Result<()> {
    let themes = match theme {
        Some(t) => vec![t.parse::<Theme>().map_err(|e| anyhow!(e))?],
        None => vec![Theme::Dark, Theme::Light],
    };

    for (i, theme) in themes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let bg = theme.background();
        println!("{theme} theme (background {bg}):\n");
        println!(
            "  {:<3} {:<18} {:<15} {:>10}  {}",
            "#", "Name", "RGB", "Brightness", "Text on accent"
        );
        for (idx, color) in theme.palette().iter().enumerate() {
            let counterpart = theme.counterpart(color.rgb);
            println!(
                "  {:<3} {:<18} {:<15} {:>10}  {:<12} \u{2194} {}",
                idx,
                color.name,
                color.rgb.to_string(),
                color.rgb.brightness(),
                color.rgb.contrast_text().to_space_separated(),
                counterpart.name,
            );
        }
    }
    Ok(())
}
