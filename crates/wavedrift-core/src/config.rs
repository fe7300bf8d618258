//! Tuning constants and the serde-backed [`EngineConfig`].
//!
//! Every field defaults to the values the site ships with, so an empty JSON
//! object (`{}`) loads the stock behaviour. Hosts may override individual
//! knobs from a tuning file; anything missing falls back to the default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::EngineError;

/// Velocity is clamped to `[-VELOCITY_CLAMP, VELOCITY_CLAMP]`.
pub const VELOCITY_CLAMP: f64 = 100.0;
/// Per-frame friction factor applied to the velocity.
pub const FRICTION: f64 = 0.95;
/// Velocities with a smaller magnitude snap to zero after friction.
pub const DECAY_CUTOFF: f64 = 0.1;
/// Velocity must be strictly beyond this magnitude to flip direction.
pub const HYSTERESIS: f64 = 0.5;

/// Number of ribbon lines in the wave background.
pub const WAVE_LINE_COUNT: usize = 50;
/// Horizontal sampling step in pixels.
pub const WAVE_SAMPLE_STEP: f64 = 5.0;
/// Resting phase rate of the wave (per frame).
pub const WAVE_BASE_SPEED: f64 = 0.0025;
/// How strongly velocity boosts the wave phase rate.
pub const WAVE_VELOCITY_SCALE: f64 = 0.0005;
/// Vertical distance between neighbouring ribbon lines.
pub const WAVE_LINE_SPREAD: f64 = 3.0;
/// Opacity of the back-most line.
pub const WAVE_ALPHA_MIN: f64 = 0.25;
/// Opacity approached by the front-most line.
pub const WAVE_ALPHA_MAX: f64 = 0.5;
/// Accent used until the style store provides a valid one.
pub const WAVE_FALLBACK_COLOR: Rgb = Rgb::new(170, 150, 210);

/// Resting marquee speed in percent per frame.
pub const MARQUEE_BASE_SPEED: f64 = 0.003;
/// How strongly velocity boosts the marquee speed.
pub const MARQUEE_VELOCITY_SCALE: f64 = 0.001;
/// Offset period in percent; the strip holds two copies of the content.
pub const MARQUEE_WRAP_PERIOD: f64 = 50.0;

/// Scroll momentum tuning shared by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub velocity_clamp: f64,
    pub friction: f64,
    pub decay_cutoff: f64,
    pub hysteresis: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            velocity_clamp: VELOCITY_CLAMP,
            friction: FRICTION,
            decay_cutoff: DECAY_CUTOFF,
            hysteresis: HYSTERESIS,
        }
    }
}

/// Speed at rest plus how much velocity adds on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Magnitude of the resting speed; the sign comes from the flow direction.
    pub base_speed: f64,
    /// Multiplier applied to the signed velocity.
    pub velocity_scale: f64,
}

impl SpeedProfile {
    pub const WAVEFORM: Self = Self {
        base_speed: WAVE_BASE_SPEED,
        velocity_scale: WAVE_VELOCITY_SCALE,
    };

    pub const MARQUEE: Self = Self {
        base_speed: MARQUEE_BASE_SPEED,
        velocity_scale: MARQUEE_VELOCITY_SCALE,
    };
}

/// Wave background tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    pub line_count: usize,
    pub sample_step: f64,
    pub line_spread: f64,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub speed: SpeedProfile,
    pub fallback_color: Rgb,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            line_count: WAVE_LINE_COUNT,
            sample_step: WAVE_SAMPLE_STEP,
            line_spread: WAVE_LINE_SPREAD,
            alpha_min: WAVE_ALPHA_MIN,
            alpha_max: WAVE_ALPHA_MAX,
            speed: SpeedProfile::WAVEFORM,
            fallback_color: WAVE_FALLBACK_COLOR,
        }
    }
}

/// Marquee tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    pub speed: SpeedProfile,
    pub wrap_period: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            speed: SpeedProfile::MARQUEE,
            wrap_period: MARQUEE_WRAP_PERIOD,
        }
    }
}

/// Complete engine tuning, loadable from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub waveform: WaveformConfig,
    pub marquee: MarqueeConfig,
}

impl EngineConfig {
    /// Parse a tuning document. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would stall or explode the animation.
    pub fn validate(&self) -> Result<(), EngineError> {
        let p = &self.physics;
        if !(p.velocity_clamp > 0.0) {
            return Err(EngineError::InvalidConfig("physics.velocity_clamp must be > 0"));
        }
        if !(0.0..1.0).contains(&p.friction) {
            return Err(EngineError::InvalidConfig("physics.friction must be in [0, 1)"));
        }
        if p.decay_cutoff < 0.0 || p.hysteresis < 0.0 {
            return Err(EngineError::InvalidConfig(
                "physics.decay_cutoff and physics.hysteresis must be >= 0",
            ));
        }
        if self.waveform.line_count == 0 {
            return Err(EngineError::InvalidConfig("waveform.line_count must be > 0"));
        }
        if !(self.waveform.sample_step > 0.0) {
            return Err(EngineError::InvalidConfig("waveform.sample_step must be > 0"));
        }
        if !(self.marquee.wrap_period > 0.0) {
            return Err(EngineError::InvalidConfig("marquee.wrap_period must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.waveform.line_count, 50);
        assert_eq!(config.marquee.wrap_period, 50.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            EngineConfig::from_json(r#"{"waveform": {"line_count": 12}, "physics": {"friction": 0.9}}"#)
                .unwrap();
        assert_eq!(config.waveform.line_count, 12);
        assert_eq!(config.waveform.sample_step, WAVE_SAMPLE_STEP);
        assert_eq!(config.physics.friction, 0.9);
        assert_eq!(config.physics.velocity_clamp, VELOCITY_CLAMP);
        assert_eq!(config.marquee, MarqueeConfig::default());
    }

    #[test]
    fn invalid_friction_rejected() {
        let err = EngineConfig::from_json(r#"{"physics": {"friction": 1.5}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn zero_line_count_rejected() {
        let err = EngineConfig::from_json(r#"{"waveform": {"line_count": 0}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"marquee": {{"wrap_period": 25.0}}}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.marquee.wrap_period, 25.0);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = EngineConfig::load(&path).unwrap_err();
        match err {
            EngineError::ConfigRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&text).unwrap(), config);
    }
}
