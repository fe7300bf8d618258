use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result, bail};
use wavedrift_core::palette::find_by_name;
use wavedrift_core::{PixelSurface, Rgb, Size, Theme, mount_waveform};

use super::{headless_host, load_config};

pub struct SnapshotCommandConfig<'a> {
    pub output: &'a str,
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    pub color: Option<&'a str>,
    pub light: bool,
    pub config_path: Option<&'a str>,
}

pub fn run(cfg: SnapshotCommandConfig) -> Result<()> {
    if cfg.width == 0 || cfg.height == 0 {
        bail!("image size must be non-zero, got {}x{}", cfg.width, cfg.height);
    }
    if cfg.frames == 0 {
        bail!("--frames must be at least 1, the mount draws the first frame");
    }
    let config = load_config(cfg.config_path)?;
    let theme = if cfg.light { Theme::Light } else { Theme::Dark };
    let accent = cfg.color.map(resolve_accent).transpose()?;

    let surface = render(cfg.width, cfg.height, cfg.frames, theme, accent, config)?;

    let file = File::create(cfg.output).with_context(|| format!("creating {}", cfg.output))?;
    surface
        .write_ppm(BufWriter::new(file))
        .with_context(|| format!("writing {}", cfg.output))?;
    println!(
        "Wrote {}x{} {theme} snapshot after {} frames to {}",
        cfg.width, cfg.height, cfg.frames, cfg.output
    );
    Ok(())
}

/// A palette name ("Muted Blue") or a raw `r, g, b` triple.
fn resolve_accent(value: &str) -> Result<Rgb> {
    if let Some(named) = find_by_name(value) {
        return Ok(named.rgb);
    }
    Rgb::parse_triple(value)
        .with_context(|| format!("'{value}' is neither a palette name nor an r, g, b triple"))
}

fn render(
    width: usize,
    height: usize,
    frames: usize,
    theme: Theme,
    accent: Option<Rgb>,
    config: wavedrift_core::EngineConfig,
) -> Result<PixelSurface> {
    let size = Size::new(width as f64, height as f64);
    let (host, _page, scheduler) = headless_host(size, theme, config);
    if let Some(rgb) = accent {
        host.style.set_primary(rgb);
    }

    let mounted = mount_waveform(&host, Some(PixelSurface::new(width, height)))?;
    // The mount already drew frame 1.
    for frame in 1..frames {
        scheduler.run_frame(frame as f64 * 16.0);
    }

    let state = mounted.state().borrow();
    Ok(state.surface.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavedrift_core::EngineConfig;

    #[test]
    fn accent_by_name_or_triple() {
        assert_eq!(resolve_accent("muted violet").unwrap(), Rgb::new(170, 150, 210));
        assert_eq!(resolve_accent("10, 20, 30").unwrap(), Rgb::new(10, 20, 30));
        assert!(resolve_accent("chartreuse-ish").is_err());
    }

    #[test]
    fn light_snapshot_has_white_background() {
        // Waves stay within ~280px of the center, so the top rows are bare.
        let surface = render(16, 800, 3, Theme::Light, None, EngineConfig::default()).unwrap();
        assert_eq!(surface.width(), 16);
        assert_eq!(surface.pixel(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn writes_ppm_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wave.ppm");
        let path_str = path.to_str().unwrap();
        run(SnapshotCommandConfig {
            output: path_str,
            width: 40,
            height: 20,
            frames: 2,
            color: Some("Muted Red"),
            light: false,
            config_path: None,
        })
        .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n40 20\n255\n"));
        assert_eq!(bytes.len(), "P6\n40 20\n255\n".len() + 40 * 20 * 3);
    }

    #[test]
    fn zero_size_rejected() {
        let err = run(SnapshotCommandConfig {
            output: "unused.ppm",
            width: 0,
            height: 10,
            frames: 1,
            color: None,
            light: false,
            config_path: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn zero_frames_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.ppm");
        let err = run(SnapshotCommandConfig {
            output: path.to_str().unwrap(),
            width: 8,
            height: 8,
            frames: 0,
            color: None,
            light: false,
            config_path: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
        assert!(!path.exists());
    }
}
