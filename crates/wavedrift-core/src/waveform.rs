//! Layered sine-wave ribbon drawn behind the page.
//!
//! Each of the `line_count` lines is an open polyline sampled every
//! `sample_step` pixels. A point's height is the sum of four sinusoids with
//! fixed spatial/temporal frequencies, nudged per line so the lines fan out
//! into a ribbon. Back lines (low index) are fainter than front lines.

use crate::color::Rgb;
use crate::config::{PhysicsConfig, WaveformConfig};
use crate::events::Size;
use crate::physics::{Momentum, MotionSample, Phase};
use crate::style::StyleStore;
use crate::surface::{Point, Surface};

/// Vertical displacement of line `line` at horizontal position `x` and
/// phase `time`.
pub fn wave_offset(x: f64, time: f64, line: usize) -> f64 {
    let i = line as f64;
    let w1 = (x * 0.0015 + time * 0.4 + i * 0.02).sin() * 80.0;
    let w2 = (x * 0.004 - time * 0.2 + i * 0.01).cos() * 40.0;
    let w3 = (x * 0.01 + time + i * 0.1).sin() * (10.0 + (line % 5) as f64 * 3.0);
    let w4 = (x * 0.003 + time * 0.3 + i * 0.015).sin() * 60.0;
    w1 + w2 + w3 + w4
}

/// Stroke opacity of line `line`, rising linearly from `alpha_min`.
pub fn line_alpha(line: usize, config: &WaveformConfig) -> f64 {
    let t = line as f64 / config.line_count as f64;
    config.alpha_min + t * (config.alpha_max - config.alpha_min)
}

/// Constant vertical shift of line `line` relative to the center.
pub fn line_spread(line: usize, config: &WaveformConfig) -> f64 {
    (line as f64 - config.line_count as f64 / 2.0) * config.line_spread
}

/// Sample one line across `size.width`: x = 0, step, 2·step, … ≤ width.
pub fn sample_line(line: usize, time: f64, size: Size, config: &WaveformConfig) -> Vec<Point> {
    let center_y = size.height / 2.0;
    let spread = line_spread(line, config);
    let count = (size.width.max(0.0) / config.sample_step).floor() as usize + 1;
    (0..count)
        .map(|k| {
            let x = k as f64 * config.sample_step;
            Point::new(x, center_y + spread + wave_offset(x, time, line))
        })
        .collect()
}

/// Per-frame state of the wave background.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    momentum: Momentum,
    color: Rgb,
    size: Size,
    config: WaveformConfig,
    frames: u64,
}

impl WaveformRenderer {
    pub fn new(initial_scroll: f64, size: Size, physics: &PhysicsConfig, config: WaveformConfig) -> Self {
        Self {
            momentum: Momentum::new(initial_scroll, physics, config.speed, Phase::Unbounded(0.0)),
            color: config.fallback_color,
            size,
            config,
            frames: 0,
        }
    }

    pub fn on_scroll(&mut self, position: f64) {
        self.momentum.on_scroll(position);
    }

    /// Adopt new viewport dimensions and resize the surface to match.
    pub fn resize(&mut self, size: Size, surface: &mut dyn Surface) {
        self.size = size;
        surface.resize(size.width, size.height);
    }

    /// Re-read the accent from `style`. A missing or malformed value keeps
    /// the current color. Returns whether the color changed.
    pub fn refresh_color(&mut self, style: &StyleStore) -> bool {
        match style.primary() {
            Some(color) if color != self.color => {
                self.color = color;
                true
            }
            Some(_) => false,
            None => {
                log::debug!("accent unreadable, keeping {}", self.color);
                false
            }
        }
    }

    /// Paint one frame: background, phase advance, then every line back to
    /// front.
    pub fn render(&mut self, surface: &mut dyn Surface, background: Rgb) -> MotionSample {
        surface.fill(background);
        let motion = self.momentum.step(1.0);
        for line in 0..self.config.line_count {
            let points = sample_line(line, motion.phase, self.size, &self.config);
            let color = self.color.with_alpha(line_alpha(line, &self.config));
            surface.stroke_polyline(&points, color, 1.0);
        }
        self.frames += 1;
        motion
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn time(&self) -> f64 {
        self.momentum.phase()
    }

    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }
}
