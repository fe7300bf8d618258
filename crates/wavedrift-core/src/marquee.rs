//! Endless horizontal strip of tags.
//!
//! The strip holds the tag list twice, back to back, so translating it by
//! anything in `[-50%, 0%]` always shows a seamless window. Forward flow
//! (scrolling down) moves the content toward negative x.

use crate::config::{MarqueeConfig, PhysicsConfig};
use crate::physics::{Momentum, MotionSample, Phase};

/// Forward flow maps to decreasing offsets.
const AXIS: f64 = -1.0;

/// Receives the strip translation each frame.
pub trait TransformTarget {
    /// Translate the strip horizontally by `percent` of its own width.
    fn set_translate_x(&mut self, percent: f64);
}

/// CSS `transform` value for an offset.
pub fn css_transform(percent: f64) -> String {
    format!("translateX({percent}%)")
}

/// The doubled strip content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeStrip {
    items: Vec<String>,
}

impl MarqueeStrip {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// One logical copy of the content.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The rendered strip: every item, twice.
    pub fn doubled(&self) -> impl Iterator<Item = &str> {
        self.items.iter().chain(self.items.iter()).map(String::as_str)
    }

    /// Text form of one copy with `separator` between and after items, so
    /// two copies concatenate with the same spacing at the seam.
    pub fn text(&self, separator: &str) -> String {
        let mut out = String::new();
        for item in &self.items {
            out.push_str(item);
            out.push_str(separator);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible window of `width` characters for a strip translated by
    /// `percent` (of the doubled strip).
    pub fn window(&self, separator: &str, percent: f64, width: usize) -> String {
        let copy: Vec<char> = self.text(separator).chars().collect();
        if copy.is_empty() || width == 0 {
            return String::new();
        }
        let doubled_len = copy.len() * 2;
        let shift = ((-percent / 100.0) * doubled_len as f64).floor() as isize;
        let start = shift.rem_euclid(copy.len() as isize) as usize;
        (0..width).map(|k| copy[(start + k) % copy.len()]).collect()
    }
}

/// Per-frame state of the marquee.
#[derive(Debug, Clone)]
pub struct MarqueeRenderer {
    momentum: Momentum,
    strip: MarqueeStrip,
    frames: u64,
}

impl MarqueeRenderer {
    pub fn new(initial_scroll: f64, strip: MarqueeStrip, physics: &PhysicsConfig, config: MarqueeConfig) -> Self {
        Self {
            momentum: Momentum::new(initial_scroll, physics, config.speed, Phase::wrapping(config.wrap_period)),
            strip,
            frames: 0,
        }
    }

    pub fn on_scroll(&mut self, position: f64) {
        self.momentum.on_scroll(position);
    }

    /// Advance the offset one frame and push it to `target`.
    pub fn render(&mut self, target: &mut dyn TransformTarget) -> MotionSample {
        let motion = self.momentum.step(AXIS);
        target.set_translate_x(motion.phase);
        self.frames += 1;
        motion
    }

    pub fn offset(&self) -> f64 {
        self.momentum.phase()
    }

    pub fn strip(&self) -> &MarqueeStrip {
        &self.strip
    }

    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Target that keeps the last translation, for hosts that read it back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastTransform {
    pub percent: Option<f64>,
    pub writes: u64,
}

impl TransformTarget for LastTransform {
    fn set_translate_x(&mut self, percent: f64) {
        self.percent = Some(percent);
        self.writes += 1;
    }
}

impl<T: TransformTarget + ?Sized> TransformTarget for Box<T> {
    fn set_translate_x(&mut self, percent: f64) {
        (**self).set_translate_x(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::FlowDirection;

    fn renderer() -> MarqueeRenderer {
        MarqueeRenderer::new(
            0.0,
            MarqueeStrip::new(["Rust", "Wasm"]),
            &PhysicsConfig::default(),
            MarqueeConfig::default(),
        )
    }

    #[test]
    fn resting_forward_moves_left() {
        let mut m = renderer();
        let mut t = LastTransform::default();
        m.render(&mut t);
        assert!((t.percent.unwrap() + 0.003).abs() < 1e-12);
        m.render(&mut t);
        assert!((m.offset() + 0.006).abs() < 1e-12);
        assert_eq!(t.writes, 2);
    }

    #[test]
    fn reverse_from_zero_wraps_into_window() {
        let mut m = renderer();
        let mut t = LastTransform::default();
        m.on_scroll(-10.0);
        let motion = m.render(&mut t);
        assert_eq!(motion.direction, FlowDirection::Reverse);
        let offset = t.percent.unwrap();
        assert!(offset > -50.0 && offset < 0.0, "{offset}");
    }

    #[test]
    fn offset_stays_in_window_under_heavy_scrolling() {
        let mut m = renderer();
        let mut t = LastTransform::default();
        let mut pos = 0.0;
        for i in 0..2000 {
            if i % 10 == 0 {
                pos += if (i / 300) % 2 == 0 { 250.0 } else { -250.0 };
                m.on_scroll(pos);
            }
            let offset = m.render(&mut t).phase;
            assert!((-50.0..=0.0).contains(&offset), "frame {i}: {offset}");
        }
    }

    #[test]
    fn strip_doubles_content() {
        let strip = MarqueeStrip::new(["a", "b", "c"]);
        let doubled: Vec<_> = strip.doubled().collect();
        assert_eq!(doubled, ["a", "b", "c", "a", "b", "c"]);
        assert_eq!(strip.text(" · "), "a · b · c · ");
    }

    #[test]
    fn window_follows_offset() {
        let strip = MarqueeStrip::new(["ab", "cd"]);
        // one copy = "ab|cd|" (6 chars), doubled = 12
        assert_eq!(strip.window("|", 0.0, 4), "ab|c");
        // -25% of 12 chars = 3 chars in
        assert_eq!(strip.window("|", -25.0, 4), "cd|a");
        // -50% lands on the start of the second copy
        assert_eq!(strip.window("|", -50.0, 4), "ab|c");
        assert_eq!(strip.window("|", -10.0, 0), "");
        assert_eq!(MarqueeStrip::new(Vec::<String>::new()).window("|", 0.0, 5), "");
    }

    #[test]
    fn css_transform_format() {
        assert_eq!(css_transform(-12.5), "translateX(-12.5%)");
    }
}
