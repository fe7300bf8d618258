use anyhow::{Context, Result};
use wavedrift_core::Theme;

use crate::tui::app::{App, LiveSettings};

pub struct LiveCommandConfig<'a> {
    pub fps: u32,
    pub config_path: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub light: bool,
}

pub fn run(cfg: LiveCommandConfig) -> Result<()> {
    let settings = LiveSettings {
        fps: cfg.fps.clamp(1, 240),
        config: super::load_config(cfg.config_path)?,
        tags: super::parse_tags(cfg.tags),
        theme: if cfg.light { Theme::Light } else { Theme::Dark },
    };
    let (cols, rows) = crossterm::terminal::size().context("reading terminal size")?;
    let mut app = App::new(settings, cols, rows);
    app.run().context("TUI error")
}
