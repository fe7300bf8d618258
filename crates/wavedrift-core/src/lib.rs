//! # wavedrift-core
//!
//! **Scroll-reactive animation engine.**
//!
//! Two effects share one momentum model: a layered sine-wave ribbon painted
//! on a drawing surface, and an endless marquee strip translated
//! horizontally. Both drift at a slow resting speed, speed up while the page
//! is scrolled, and keep flowing in the last scroll direction once the
//! scrolling stops.
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use wavedrift_core::{
//!     EngineConfig, Host, ManualScheduler, Size, StyleStore, ViewportEvents, Viewport,
//!     DisplayList, mount_waveform,
//! };
//!
//! struct Page;
//! impl Viewport for Page {
//!     fn size(&self) -> Size { Size::new(320.0, 200.0) }
//!     fn scroll_offset(&self) -> f64 { 0.0 }
//! }
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let host = Host {
//!     viewport: Rc::new(Page),
//!     events: Rc::new(ViewportEvents::new()),
//!     style: Rc::new(StyleStore::new()),
//!     scheduler: scheduler.clone(),
//!     config: EngineConfig::default(),
//! };
//!
//! let wave = mount_waveform(&host, Some(DisplayList::new())).unwrap();
//! host.events.scroll.emit(&40.0);
//! scheduler.run_frame(16.0);
//! assert_eq!(wave.state().borrow().surface.strokes().len(), 50);
//! ```
//!
//! ## Architecture
//!
//! scroll → [`VelocityTracker`] → [`FlowController`] → phase → renderer
//!
//! - [`physics`]: clamped, decaying velocity; direction latch with
//!   hysteresis; unbounded and wrapping phase accumulators.
//! - [`waveform`] / [`marquee`]: the two renderers.
//! - [`style`] / [`palette`]: accent color and theme, with change
//!   notifications.
//! - [`scheduler`] / [`events`] / [`effect`]: frame loop, subscriptions and
//!   the mount/unmount lifecycle tying them together.

pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod events;
pub mod marquee;
pub mod palette;
pub mod physics;
pub mod scheduler;
pub mod style;
pub mod surface;
pub mod waveform;

pub use color::{Rgb, Rgba};
pub use config::{EngineConfig, MarqueeConfig, PhysicsConfig, SpeedProfile, WaveformConfig};
pub use effect::{Host, MarqueeEffect, Mounted, Viewport, WaveformEffect, mount_marquee, mount_waveform};
pub use error::EngineError;
pub use events::{Emitter, Size, Subscription, ViewportEvents};
pub use marquee::{LastTransform, MarqueeRenderer, MarqueeStrip, TransformTarget, css_transform};
pub use palette::{BRIGHT, MUTED, NamedColor, Theme};
pub use physics::{FlowController, FlowDirection, Momentum, MotionSample, Phase, VelocityTracker, effective_speed};
pub use scheduler::{AnimationLoop, FrameCallback, FrameEffect, FrameHandle, FrameScheduler, ManualScheduler};
pub use style::{PaletteChanged, StyleStore};
pub use surface::{DisplayList, PixelSurface, Point, Stroke, Surface};
pub use waveform::WaveformRenderer;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
