use anyhow::{Result, bail};
use serde::Serialize;
use wavedrift_core::{
    DisplayList, LastTransform, MarqueeStrip, MotionSample, Size, Theme, mount_marquee,
    mount_waveform,
};

use super::{headless_host, load_config, parse_scroll_script};

/// Nominal frame spacing for the simulated clock.
const FRAME_MS: f64 = 1000.0 / 60.0;

pub struct SimulateCommandConfig<'a> {
    pub scroll: &'a str,
    pub frames: Option<usize>,
    pub effect: &'a str,
    pub config_path: Option<&'a str>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FrameRow {
    frame: usize,
    scroll: f64,
    #[serde(flatten)]
    motion: MotionSample,
}

pub fn run(cfg: SimulateCommandConfig) -> Result<()> {
    let deltas = parse_scroll_script(cfg.scroll)?;
    let frames = cfg.frames.unwrap_or(deltas.len() + 1);
    let config = load_config(cfg.config_path)?;
    let rows = simulate(cfg.effect, &deltas, frames, config)?;

    if cfg.json {
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
        return Ok(());
    }

    println!(
        "{:>6} {:>10} {:>10} {:>8} {:>12} {:>14}",
        "Frame", "Scroll", "Velocity", "Flow", "Speed", "Phase"
    );
    println!("{}", "-".repeat(65));
    for row in &rows {
        println!(
            "{:>6} {:>10.1} {:>10.4} {:>8} {:>12.6} {:>14.6}",
            row.frame,
            row.scroll,
            row.motion.velocity,
            row.motion.direction.to_string(),
            row.motion.speed,
            row.motion.phase,
        );
    }
    Ok(())
}

/// Mount `effect` headless and run `frames` frames. Frame 0 is the one the
/// mount itself draws; every later frame first applies the next delta.
fn simulate(
    effect: &str,
    deltas: &[f64],
    frames: usize,
    config: wavedrift_core::EngineConfig,
) -> Result<Vec<FrameRow>> {
    let (host, page, scheduler) = headless_host(Size::new(1280.0, 720.0), Theme::Dark, config);
    let mut rows = Vec::with_capacity(frames);
    if frames == 0 {
        return Ok(rows);
    }

    // Each arm keeps its mount alive for the whole loop.
    let last_motion: Box<dyn Fn() -> Option<MotionSample>> = match effect {
        "waveform" => {
            let mounted = mount_waveform(&host, Some(DisplayList::new()))?;
            Box::new(move || mounted.state().borrow().last_motion)
        }
        "marquee" => {
            let strip = MarqueeStrip::new(super::DEFAULT_TAGS.iter().copied());
            let mounted = mount_marquee(&host, strip, Some(LastTransform::default()))?;
            Box::new(move || mounted.state().borrow().last_motion)
        }
        other => bail!("unknown effect '{other}' (expected waveform or marquee)"),
    };

    for frame in 0..frames {
        if frame > 0 {
            if let Some(delta) = deltas.get(frame - 1) {
                let y = page.scroll.get() + delta;
                page.scroll.set(y);
                host.events.scroll.emit(&y);
            }
            scheduler.run_frame(frame as f64 * FRAME_MS);
        }
        if let Some(motion) = last_motion() {
            rows.push(FrameRow {
                frame,
                scroll: page.scroll.get(),
                motion,
            });
        }
    }
    Ok(rows)
}
