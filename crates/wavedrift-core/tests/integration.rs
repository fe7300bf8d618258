//! Integration tests for wavedrift-core.
//!
//! These drive the public API the way a host does: mount effects on a
//! shared host, feed scroll and palette events, pump frames, unmount.

use std::cell::Cell;
use std::rc::Rc;

use wavedrift_core::{
    DisplayList, EngineConfig, FlowDirection, Host, LastTransform, ManualScheduler, MarqueeStrip,
    PixelSurface, Rgb, Size, StyleStore, Theme, VelocityTracker, Viewport, ViewportEvents,
    effective_speed, mount_marquee, mount_waveform, SpeedProfile,
};

struct Page {
    size: Cell<Size>,
    scroll: Cell<f64>,
}

impl Viewport for Page {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }
}

struct Harness {
    host: Host,
    page: Rc<Page>,
    scheduler: Rc<ManualScheduler>,
    clock: f64,
}

impl Harness {
    fn new(config: EngineConfig) -> Self {
        let page = Rc::new(Page {
            size: Cell::new(Size::new(160.0, 90.0)),
            scroll: Cell::new(0.0),
        });
        let scheduler = Rc::new(ManualScheduler::new());
        let host = Host {
            viewport: page.clone(),
            events: Rc::new(ViewportEvents::new()),
            style: Rc::new(StyleStore::with_theme(Theme::Dark)),
            scheduler: scheduler.clone(),
            config,
        };
        Self {
            host,
            page,
            scheduler,
            clock: 0.0,
        }
    }

    fn scroll_to(&self, y: f64) {
        self.page.scroll.set(y);
        self.host.events.scroll.emit(&y);
    }

    fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.clock += 16.0;
            self.scheduler.run_frame(self.clock);
        }
    }
}

#[test]
fn end_to_end_velocity_example() {
    let mut t = VelocityTracker::new(0.0);
    let mut pos = 0.0;
    for delta in [10.0, 20.0, -5.0] {
        pos += delta;
        t.on_scroll(pos);
    }
    assert_eq!(t.velocity(), 25.0);
    t.decay();
    assert!((t.velocity() - 23.75).abs() < 1e-12);
}

#[test]
fn resting_waveform_speed_is_exact_base() {
    assert_eq!(
        effective_speed(&SpeedProfile::WAVEFORM, FlowDirection::Forward, 0.0),
        0.0025
    );
}

#[test]
fn scroll_burst_then_idle_keeps_direction() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();

    // Scroll up the page in a few bursts, interleaved with frames.
    for y in [-30.0, -80.0, -120.0] {
        h.scroll_to(y);
        h.frames(2);
    }
    h.frames(400);

    let state = wave.state().borrow();
    let motion = state.last_motion.unwrap();
    assert_eq!(motion.velocity, 0.0);
    assert_eq!(motion.direction, FlowDirection::Reverse);
    assert_eq!(motion.speed, -0.0025);
}

#[test]
fn theme_toggle_recolors_and_repaints_background() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();
    assert_eq!(wave.state().borrow().renderer.color(), Rgb::new(170, 150, 210));

    h.host.style.toggle_theme();
    h.frames(1);

    let state = wave.state().borrow();
    assert_eq!(state.renderer.color(), Rgb::new(90, 50, 170));
    assert_eq!(state.surface.background(), Some(Rgb::WHITE));
    assert_eq!(state.surface.strokes()[10].color.rgb, Rgb::new(90, 50, 170));
}

#[test]
fn malformed_palette_write_keeps_last_valid_color() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();
    h.host.style.set_primary_color("220, 120, 120");
    h.host.style.set_primary_color("abc");
    h.host.style.set_primary_color("1,2");
    h.frames(1);
    assert_eq!(wave.state().borrow().renderer.color(), Rgb::new(220, 120, 120));
}

#[test]
fn fractional_palette_write_reads_leading_digits() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();
    h.host.style.set_primary_color("20.9, 70, 170");
    h.frames(1);
    assert_eq!(wave.state().borrow().renderer.color(), Rgb::new(20, 70, 170));
    assert_eq!(h.host.style.text_on_primary().as_deref(), Some("255 255 255"));
}

#[test]
fn pixel_surface_receives_strokes() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(PixelSurface::new(1, 1))).unwrap();
    h.frames(1);
    let state = wave.state().borrow();
    assert_eq!(state.surface.width(), 160);
    assert_eq!(state.surface.height(), 90);
    let lit = (0..160)
        .flat_map(|x| (0..90).map(move |y| (x, y)))
        .filter(|&(x, y)| state.surface.pixel(x, y) != Some(Rgb::BLACK))
        .count();
    assert!(lit > 0, "expected some wave pixels");
}

#[test]
fn marquee_reverses_and_stays_seamless() {
    let mut h = Harness::new(EngineConfig::default());
    let strip = MarqueeStrip::new(["Rust", "Wasm", "Tokio"]);
    let marquee = mount_marquee(&h.host, strip, Some(LastTransform::default())).unwrap();

    h.frames(10);
    let forward_offset = marquee.state().borrow().renderer.offset();
    assert!(forward_offset < 0.0 && forward_offset > -1.0);

    h.scroll_to(-500.0);
    h.frames(5);
    let state = marquee.state().borrow();
    assert_eq!(state.last_motion.unwrap().direction, FlowDirection::Reverse);
    let offset = state.target.percent.unwrap();
    assert!((-50.0..=0.0).contains(&offset));
}

#[test]
fn custom_config_changes_line_count() {
    let config = EngineConfig::from_json(r#"{"waveform": {"line_count": 7}}"#).unwrap();
    let mut h = Harness::new(config);
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();
    h.frames(1);
    assert_eq!(wave.state().borrow().surface.strokes().len(), 7);
}

#[test]
fn teardown_in_any_order_leaves_host_clean() {
    let mut h = Harness::new(EngineConfig::default());
    let wave = mount_waveform(&h.host, Some(DisplayList::new())).unwrap();
    let marquee = mount_marquee(&h.host, MarqueeStrip::new(["a"]), Some(LastTransform::default())).unwrap();
    h.frames(3);

    drop(marquee);
    h.scroll_to(50.0);
    h.frames(1);
    wave.unmount();

    assert_eq!(h.scheduler.pending_count(), 0);
    assert_eq!(h.host.events.scroll.listener_count(), 0);
    assert_eq!(h.host.events.resize.listener_count(), 0);
    assert_eq!(h.host.style.subscriber_count(), 0);
}
