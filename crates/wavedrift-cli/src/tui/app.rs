//! TUI application state and event loop.
//!
//! The terminal plays the page: the mouse wheel and arrow keys move a virtual
//! scroll position, the window is the viewport, and both effects are mounted
//! on a host built from those. Frames are paced by the event loop through a
//! manual scheduler, so everything stays on this thread.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use wavedrift_core::{
    DisplayList, EngineConfig, Host, LastTransform, ManualScheduler, MarqueeEffect, MarqueeStrip,
    Mounted, Size, StyleStore, Theme, Viewport, ViewportEvents, WaveformEffect, mount_marquee,
    mount_waveform,
};

/// Virtual pixels per terminal cell.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

/// Scroll step for the wheel and arrow keys, and for page keys.
const LINE_STEP: f64 = 40.0;
const PAGE_STEP: f64 = 400.0;

/// Virtual page length in screen heights.
const PAGE_SCREENS: f64 = 12.0;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The terminal window seen as a scrollable page.
pub struct TerminalViewport {
    size: Cell<Size>,
    scroll: Cell<f64>,
    started: Instant,
}

impl TerminalViewport {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Cell::new(cell_size(cols, rows)),
            scroll: Cell::new(0.0),
            started: Instant::now(),
        }
    }

    fn max_scroll(&self) -> f64 {
        let h = self.size.get().height;
        (h * PAGE_SCREENS - h).max(0.0)
    }
}

impl Viewport for TerminalViewport {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

fn cell_size(cols: u16, rows: u16) -> Size {
    Size::new(f64::from(cols) * CELL_WIDTH, f64::from(rows) * CELL_HEIGHT)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct LiveSettings {
    pub fps: u32,
    pub config: EngineConfig,
    pub tags: Vec<String>,
    pub theme: Theme,
}

pub type WaveMount = Mounted<WaveformEffect<DisplayList>>;
pub type MarqueeMount = Mounted<MarqueeEffect<LastTransform>>;

pub struct App {
    host: Host,
    page: Rc<TerminalViewport>,
    scheduler: Rc<ManualScheduler>,
    tags: Vec<String>,
    wave: Option<WaveMount>,
    marquee: Option<MarqueeMount>,
    frame_interval: Duration,
    running: bool,
}

impl App {
    pub fn new(settings: LiveSettings, cols: u16, rows: u16) -> Self {
        let page = Rc::new(TerminalViewport::new(cols, rows));
        let scheduler = Rc::new(ManualScheduler::new());
        let host = Host {
            viewport: page.clone(),
            events: Rc::new(ViewportEvents::new()),
            style: Rc::new(StyleStore::with_theme(settings.theme)),
            scheduler: scheduler.clone(),
            config: settings.config,
        };
        let mut app = Self {
            host,
            page,
            scheduler,
            tags: settings.tags,
            wave: None,
            marquee: None,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(settings.fps.max(1))),
            running: true,
        };
        app.mount();
        app
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before the panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(
                io::stdout(),
                DisableMouseCapture,
                LeaveAlternateScreen,
                crossterm::cursor::Show
            );
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut next_frame = Instant::now();

        while self.running {
            if Instant::now() >= next_frame {
                self.tick();
                terminal.draw(|f| super::ui::draw(f, self))?;
                next_frame += self.frame_interval;
                // Skip frames we fell behind on instead of bursting.
                if next_frame < Instant::now() {
                    next_frame = Instant::now() + self.frame_interval;
                }
            }

            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code)
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse.kind),
                    Event::Resize(cols, rows) => self.resize(cols, rows),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Run one animation frame for every mounted effect.
    pub fn tick(&mut self) -> usize {
        self.scheduler.run_frame(self.page.now_ms())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(LINE_STEP),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-LINE_STEP),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(PAGE_STEP),
            KeyCode::PageUp => self.scroll_by(-PAGE_STEP),
            KeyCode::Home => self.scroll_to(0.0),
            KeyCode::End => self.scroll_to(self.page.max_scroll()),
            KeyCode::Char('t') => {
                self.host.style.toggle_theme();
            }
            KeyCode::Char('c') => {
                self.host.style.cycle_accent(1);
            }
            KeyCode::Char('C') => {
                self.host.style.cycle_accent(-1);
            }
            KeyCode::Char('p') => self.toggle_pause(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind) {
        match kind {
            MouseEventKind::ScrollDown => self.scroll_by(LINE_STEP),
            MouseEventKind::ScrollUp => self.scroll_by(-LINE_STEP),
            _ => {}
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let size = cell_size(cols, rows);
        self.page.size.set(size);
        self.host.events.resize.emit(&size);
        // A shorter page may leave us past the end.
        if self.page.scroll.get() > self.page.max_scroll() {
            self.scroll_to(self.page.max_scroll());
        }
    }

    fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.page.scroll.get() + delta);
    }

    fn scroll_to(&mut self, y: f64) {
        let y = y.clamp(0.0, self.page.max_scroll());
        if y != self.page.scroll.get() {
            self.page.scroll.set(y);
            self.host.events.scroll.emit(&y);
        }
    }

    /// Pausing unmounts both effects; resuming mounts fresh ones.
    fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.mount();
        } else {
            self.wave = None;
            self.marquee = None;
            log::info!("paused");
        }
    }

    fn mount(&mut self) {
        // Errors are already logged by the mount and leave the effect off.
        self.wave = mount_waveform(&self.host, Some(DisplayList::new())).ok();
        let strip = MarqueeStrip::new(self.tags.iter().cloned());
        self.marquee = mount_marquee(&self.host, strip, Some(LastTransform::default())).ok();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.wave.is_none() && self.marquee.is_none()
    }

    pub fn wave(&self) -> Option<&WaveMount> {
        self.wave.as_ref()
    }

    pub fn marquee(&self) -> Option<&MarqueeMount> {
        self.marquee.as_ref()
    }

    pub fn style(&self) -> &StyleStore {
        &self.host.style
    }

    pub fn viewport_size(&self) -> Size {
        self.page.size.get()
    }

    pub fn scroll(&self) -> f64 {
        self.page.scroll.get()
    }

    pub fn max_scroll(&self) -> f64 {
        self.page.max_scroll()
    }

    /// Name of the current accent, or its raw triple when it is off-palette.
    pub fn accent_name(&self) -> String {
        let style = &self.host.style;
        match style.primary() {
            Some(rgb) => match style.theme().index_of(rgb) {
                Some(i) => style.theme().palette()[i].name.to_string(),
                None => rgb.to_string(),
            },
            None => "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavedrift_core::{FlowDirection, Rgb};

    fn app() -> App {
        App::new(
            LiveSettings {
                fps: 60,
                config: EngineConfig::default(),
                tags: vec!["Rust".into(), "Wasm".into()],
                theme: Theme::Dark,
            },
            80,
            24,
        )
    }

    #[test]
    fn mounts_both_effects_sized_from_terminal() {
        let app = app();
        assert!(!app.is_paused());
        assert_eq!(app.viewport_size(), Size::new(640.0, 384.0));
        let wave = app.wave().unwrap();
        assert_eq!(wave.state().borrow().renderer.size(), Size::new(640.0, 384.0));
        assert_eq!(wave.state().borrow().renderer.frames(), 1);
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut a = app();
        a.handle_key(KeyCode::Char('q'));
        assert!(!a.is_running());
        let mut b = app();
        b.handle_key(KeyCode::Esc);
        assert!(!b.is_running());
    }

    #[test]
    fn scroll_is_clamped_to_page() {
        let mut a = app();
        a.handle_key(KeyCode::Up);
        assert_eq!(a.scroll(), 0.0);
        a.handle_mouse(MouseEventKind::ScrollDown);
        assert_eq!(a.scroll(), LINE_STEP);
        a.handle_key(KeyCode::End);
        assert_eq!(a.scroll(), a.max_scroll());
        a.handle_key(KeyCode::PageDown);
        assert_eq!(a.scroll(), a.max_scroll());
        a.handle_key(KeyCode::Home);
        assert_eq!(a.scroll(), 0.0);
    }

    #[test]
    fn scrolling_up_reverses_flow() {
        let mut a = app();
        a.handle_key(KeyCode::PageDown);
        a.tick();
        a.handle_key(KeyCode::Home);
        a.tick();
        let wave = a.wave().unwrap().state().borrow();
        assert_eq!(wave.last_motion.unwrap().direction, FlowDirection::Reverse);
    }

    #[test]
    fn theme_and_accent_keys_recolor_wave() {
        let mut a = app();
        a.handle_key(KeyCode::Char('c'));
        assert_eq!(a.accent_name(), "Muted Emerald");
        a.handle_key(KeyCode::Char('C'));
        assert_eq!(a.accent_name(), "Muted Violet");
        a.handle_key(KeyCode::Char('t'));
        assert_eq!(a.style().theme(), Theme::Light);
        let color = a.wave().unwrap().state().borrow().renderer.color();
        assert_eq!(color, Rgb::new(90, 50, 170));
    }

    #[test]
    fn pause_unmounts_and_resume_remounts() {
        let mut a = app();
        a.handle_key(KeyCode::Char('p'));
        assert!(a.is_paused());
        assert_eq!(a.host.style.subscriber_count(), 0);
        assert_eq!(a.host.events.scroll.listener_count(), 0);
        assert_eq!(a.tick(), 0);

        a.handle_key(KeyCode::Char('p'));
        assert!(!a.is_paused());
        assert_eq!(a.host.events.scroll.listener_count(), 2);
        assert_eq!(a.tick(), 2);
    }

    #[test]
    fn resize_reaches_the_wave() {
        let mut a = app();
        a.resize(100, 30);
        let wave = a.wave().unwrap().state().borrow();
        assert_eq!(wave.renderer.size(), Size::new(800.0, 480.0));
    }
}
