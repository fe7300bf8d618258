//! Mounting effects onto a host and tearing them down again.
//!
//! A mounted effect owns three kinds of resources: listener subscriptions
//! (scroll, resize, palette), the animation loop, and the render state they
//! share. [`Mounted`] holds all of them; dropping it releases everything at
//! once, whichever way the owner goes out of scope.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{Size, Subscription, ViewportEvents};
use crate::marquee::{MarqueeRenderer, MarqueeStrip, TransformTarget};
use crate::physics::MotionSample;
use crate::scheduler::{AnimationLoop, FrameEffect, FrameScheduler};
use crate::style::StyleStore;
use crate::surface::Surface;
use crate::waveform::WaveformRenderer;

/// Queries a host answers synchronously.
pub trait Viewport {
    fn size(&self) -> Size;
    fn scroll_offset(&self) -> f64;
    /// Current time in milliseconds, used to stamp the first frame.
    fn now_ms(&self) -> f64 {
        0.0
    }
}

/// Everything an effect needs from its environment.
#[derive(Clone)]
pub struct Host {
    pub viewport: Rc<dyn Viewport>,
    pub events: Rc<ViewportEvents>,
    pub style: Rc<StyleStore>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub config: EngineConfig,
}

/// Live effect. Drop (or [`Mounted::unmount`]) to stop it.
pub struct Mounted<R> {
    state: Rc<RefCell<R>>,
    animation: AnimationLoop,
    subscriptions: Vec<Subscription>,
    name: &'static str,
}

impl<R> Mounted<R> {
    /// Shared render state, for hosts that display stats or read results.
    pub fn state(&self) -> &Rc<RefCell<R>> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn unmount(self) {}
}

impl<R> Drop for Mounted<R> {
    fn drop(&mut self) {
        self.animation.stop();
        self.subscriptions.clear();
        log::debug!("{} unmounted", self.name);
    }
}

// ---------------------------------------------------------------------------
// Wave background
// ---------------------------------------------------------------------------

/// Wave renderer bound to its surface and style store.
pub struct WaveformEffect<S: Surface> {
    pub renderer: WaveformRenderer,
    pub surface: S,
    pub last_motion: Option<MotionSample>,
    style: Rc<StyleStore>,
}

impl<S: Surface> FrameEffect for WaveformEffect<S> {
    fn frame(&mut self, _timestamp_ms: f64) {
        let background = self.style.background();
        self.last_motion = Some(self.renderer.render(&mut self.surface, background));
    }
}

/// Start the wave background on `surface`.
///
/// Returns [`EngineError::MissingSurface`] when the host has nothing to draw
/// on; callers are expected to log it and run without the effect.
pub fn mount_waveform<S: Surface + 'static>(
    host: &Host,
    surface: Option<S>,
) -> Result<Mounted<WaveformEffect<S>>, EngineError> {
    let Some(mut surface) = surface else {
        log::warn!("waveform: no drawing surface, effect disabled");
        return Err(EngineError::MissingSurface { effect: "waveform" });
    };

    let size = host.viewport.size();
    let mut renderer = WaveformRenderer::new(
        host.viewport.scroll_offset(),
        size,
        &host.config.physics,
        host.config.waveform,
    );
    renderer.resize(size, &mut surface);
    renderer.refresh_color(&host.style);

    let state = Rc::new(RefCell::new(WaveformEffect {
        renderer,
        surface,
        last_motion: None,
        style: Rc::clone(&host.style),
    }));

    let mut subscriptions = Vec::with_capacity(3);

    let s = Rc::clone(&state);
    subscriptions.push(host.events.resize.subscribe(move |size: &Size| {
        let mut fx = s.borrow_mut();
        let fx = &mut *fx;
        log::debug!("waveform: resize to {}x{}", size.width, size.height);
        fx.renderer.resize(*size, &mut fx.surface);
    }));

    let s = Rc::clone(&state);
    subscriptions.push(host.events.scroll.subscribe(move |y: &f64| {
        s.borrow_mut().renderer.on_scroll(*y);
    }));

    let s = Rc::clone(&state);
    let style = Rc::clone(&host.style);
    subscriptions.push(host.style.subscribe(move |_| {
        s.borrow_mut().renderer.refresh_color(&style);
    }));

    let animation = AnimationLoop::start(Rc::clone(&host.scheduler), Rc::clone(&state), host.viewport.now_ms());
    log::debug!("waveform mounted at {}x{}", size.width, size.height);

    Ok(Mounted {
        state,
        animation,
        subscriptions,
        name: "waveform",
    })
}

// ---------------------------------------------------------------------------
// Marquee
// ---------------------------------------------------------------------------

/// Marquee renderer bound to the element it translates.
pub struct MarqueeEffect<T: TransformTarget> {
    pub renderer: MarqueeRenderer,
    pub target: T,
    pub last_motion: Option<MotionSample>,
}

impl<T: TransformTarget> FrameEffect for MarqueeEffect<T> {
    fn frame(&mut self, _timestamp_ms: f64) {
        self.last_motion = Some(self.renderer.render(&mut self.target));
    }
}

/// Start the marquee, translating `target` every frame.
pub fn mount_marquee<T: TransformTarget + 'static>(
    host: &Host,
    strip: MarqueeStrip,
    target: Option<T>,
) -> Result<Mounted<MarqueeEffect<T>>, EngineError> {
    let Some(target) = target else {
        log::warn!("marquee: no strip element, effect disabled");
        return Err(EngineError::MissingSurface { effect: "marquee" });
    };

    let renderer = MarqueeRenderer::new(
        host.viewport.scroll_offset(),
        strip,
        &host.config.physics,
        host.config.marquee,
    );
    let state = Rc::new(RefCell::new(MarqueeEffect {
        renderer,
        target,
        last_motion: None,
    }));

    let s = Rc::clone(&state);
    let subscriptions = vec![host.events.scroll.subscribe(move |y: &f64| {
        s.borrow_mut().renderer.on_scroll(*y);
    })];

    let animation = AnimationLoop::start(Rc::clone(&host.scheduler), Rc::clone(&state), host.viewport.now_ms());
    log::debug!("marquee mounted");

    Ok(Mounted {
        state,
        animation,
        subscriptions,
        name: "marquee",
    })
}
