//! Scroll momentum model shared by the wave background and the marquee.
//!
//! Pipeline per frame:
//!
//! ```text
//! scroll samples ─▶ VelocityTracker ─▶ FlowController ─▶ effective speed ─▶ Phase
//!                    (clamp, friction)   (hysteresis)
//! ```
//!
//! Scroll notifications and frame ticks interleave arbitrarily; the tracker
//! only ever sees "add this delta" and "apply friction once", so any
//! ordering of the two produces a valid state.

use serde::{Deserialize, Serialize};

use crate::config::{PhysicsConfig, SpeedProfile};

// ---------------------------------------------------------------------------
// Velocity tracker
// ---------------------------------------------------------------------------

/// Turns scroll positions into a clamped, decaying velocity.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    velocity: f64,
    last_position: f64,
    clamp: f64,
    friction: f64,
    cutoff: f64,
}

impl VelocityTracker {
    /// Start tracking from the current scroll offset.
    pub fn new(initial_position: f64) -> Self {
        Self::with_config(initial_position, &PhysicsConfig::default())
    }

    pub fn with_config(initial_position: f64, config: &PhysicsConfig) -> Self {
        Self {
            velocity: 0.0,
            last_position: initial_position,
            clamp: config.velocity_clamp,
            friction: config.friction,
            cutoff: config.decay_cutoff,
        }
    }

    /// Record a new scroll offset. The delta from the previous sample is
    /// added to the velocity, which is then clamped.
    pub fn on_scroll(&mut self, position: f64) {
        let delta = position - self.last_position;
        self.velocity = (self.velocity + delta).clamp(-self.clamp, self.clamp);
        self.last_position = position;
    }

    /// Apply one frame of friction.
    pub fn decay(&mut self) {
        self.velocity *= self.friction;
        if self.velocity.abs() < self.cutoff {
            self.velocity = 0.0;
        }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity == 0.0
    }
}

// ---------------------------------------------------------------------------
// Flow direction
// ---------------------------------------------------------------------------

/// Resting direction of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Follows downward scrolling; the default before any input.
    #[default]
    Forward,
    /// Follows upward scrolling.
    Reverse,
}

impl FlowDirection {
    /// `+1.0` for forward, `-1.0` for reverse.
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl std::fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// Latches the flow direction from the sign of the velocity.
///
/// Inside the `[-threshold, threshold]` band the previous direction is kept,
/// so friction bringing the velocity back to zero never flips it.
#[derive(Debug, Clone)]
pub struct FlowController {
    direction: FlowDirection,
    threshold: f64,
}

impl FlowController {
    pub fn new(threshold: f64) -> Self {
        Self {
            direction: FlowDirection::default(),
            threshold,
        }
    }

    pub fn update(&mut self, velocity: f64) -> FlowDirection {
        let next = if velocity > self.threshold {
            FlowDirection::Forward
        } else if velocity < -self.threshold {
            FlowDirection::Reverse
        } else {
            self.direction
        };
        if next != self.direction {
            log::trace!("flow direction {} -> {} (v={velocity:.3})", self.direction, next);
            self.direction = next;
        }
        self.direction
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(PhysicsConfig::default().hysteresis)
    }
}

/// Base speed signed by direction plus the velocity boost.
pub fn effective_speed(profile: &SpeedProfile, direction: FlowDirection, velocity: f64) -> f64 {
    profile.base_speed * direction.sign() + velocity * profile.velocity_scale
}

// ---------------------------------------------------------------------------
// Phase accumulators
// ---------------------------------------------------------------------------

/// Animation parameter advanced by the effective speed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Grows or shrinks without bound (wave time).
    Unbounded(f64),
    /// Kept inside `[-period, 0]` (marquee offset in percent). The edges
    /// are only reached when a step lands exactly on the opposite edge.
    Wrapping { value: f64, period: f64 },
}

impl Phase {
    pub fn wrapping(period: f64) -> Self {
        Self::Wrapping { value: 0.0, period }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Self::Unbounded(v) => v,
            Self::Wrapping { value, .. } => value,
        }
    }

    /// Add `step` and, for the wrapping variant, fold the result back by one
    /// period when it reaches either end.
    pub fn advance(&mut self, step: f64) -> f64 {
        match self {
            Self::Unbounded(v) => {
                *v += step;
                *v
            }
            Self::Wrapping { value, period } => {
                *value += step;
                if *value <= -*period {
                    *value += *period;
                } else if *value >= 0.0 {
                    *value -= *period;
                }
                *value
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Momentum: tracker + controller + phase
// ---------------------------------------------------------------------------

/// Snapshot of a [`Momentum`] after a frame step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionSample {
    pub velocity: f64,
    pub direction: FlowDirection,
    pub speed: f64,
    pub phase: f64,
}

/// The per-renderer physics state: one tracker, one controller, one phase.
#[derive(Debug, Clone)]
pub struct Momentum {
    tracker: VelocityTracker,
    flow: FlowController,
    profile: SpeedProfile,
    phase: Phase,
}

impl Momentum {
    pub fn new(initial_position: f64, physics: &PhysicsConfig, profile: SpeedProfile, phase: Phase) -> Self {
        Self {
            tracker: VelocityTracker::with_config(initial_position, physics),
            flow: FlowController::new(physics.hysteresis),
            profile,
            phase,
        }
    }

    pub fn on_scroll(&mut self, position: f64) {
        self.tracker.on_scroll(position);
    }

    /// Advance one frame: latch direction from the current velocity, apply
    /// friction, then move the phase by `effective_speed * axis`.
    pub fn step(&mut self, axis: f64) -> MotionSample {
        let direction = self.flow.update(self.tracker.velocity());
        self.tracker.decay();
        let speed = effective_speed(&self.profile, direction, self.tracker.velocity());
        let phase = self.phase.advance(speed * axis);
        MotionSample {
            velocity: self.tracker.velocity(),
            direction,
            speed,
            phase,
        }
    }

    pub fn tracker(&self) -> &VelocityTracker {
        &self.tracker
    }

    pub fn direction(&self) -> FlowDirection {
        self.flow.direction()
    }

    pub fn phase(&self) -> f64 {
        self.phase.value()
    }

    pub fn speed(&self) -> f64 {
        effective_speed(&self.profile, self.flow.direction(), self.tracker.velocity())
    }
}
