//! wavedrift WebAssembly bindings: the engine mounted on a real page.
//!
//! Exposes to JavaScript:
//!
//! 1. **`mount_background(canvas_id)`**: wave ribbon on a full-window canvas
//! 2. **`mount_marquee(element_id, tags)`**: fills an element with the tag
//!    strip (twice) and scrolls it
//! 3. **`set_primary_color` / `toggle_theme` / `cycle_accent`**: palette
//!    writes, mirrored to `--primary-rgb`, `--text-on-primary` and the
//!    `light-mode` class on the root element
//!
//! Every mount returns an [`EffectHandle`]. Call `unmount()` or `free()` on
//! it to stop the animation and detach its listeners; a handle the page just
//! forgets keeps the effect running.

mod dom;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use wavedrift_core::style::{PRIMARY_RGB, TEXT_ON_PRIMARY};
use wavedrift_core::{
    EngineConfig, Host, MarqueeStrip, StyleStore, Subscription, Theme, ViewportEvents,
    mount_marquee as mount_marquee_effect, mount_waveform,
};

use dom::{CanvasSurface, DomListener, ElementTransform, RafScheduler, WindowViewport, window_size};

const LIGHT_MODE_CLASS: &str = "light-mode";

// ---------------------------------------------------------------------------
// Page-wide engine state
// ---------------------------------------------------------------------------

/// One host per page, shared by every mounted effect.
struct Engine {
    host: Host,
    config: Cell<EngineConfig>,
    _listeners: Vec<DomListener>,
    _style_sync: Subscription,
}

thread_local! {
    static ENGINE: RefCell<Option<Rc<Engine>>> = const { RefCell::new(None) };
}

fn js_err(msg: impl Into<String>) -> JsValue {
    JsValue::from_str(&msg.into())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_err("no window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window.document().ok_or_else(|| js_err("no document"))
}

fn root_element(document: &Document) -> Result<HtmlElement, JsValue> {
    document
        .document_element()
        .ok_or_else(|| js_err("no root element"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| js_err("root element is not an HTML element"))
}

fn engine() -> Result<Rc<Engine>, JsValue> {
    if let Some(engine) = ENGINE.with(|e| e.borrow().clone()) {
        return Ok(engine);
    }
    let engine = Rc::new(Engine::install()?);
    ENGINE.with(|e| *e.borrow_mut() = Some(Rc::clone(&engine)));
    Ok(engine)
}

impl Engine {
    fn install() -> Result<Self, JsValue> {
        let window = window()?;
        let root = root_element(&document(&window)?)?;

        let theme = if root.class_list().contains(LIGHT_MODE_CLASS) {
            Theme::Light
        } else {
            Theme::Dark
        };
        let style = Rc::new(StyleStore::with_theme(theme));
        // Keep an accent the page stylesheet already chose.
        if let Ok(Some(computed)) = window.get_computed_style(&root)
            && let Ok(value) = computed.get_property_value(PRIMARY_RGB)
            && !value.trim().is_empty()
        {
            style.set_primary_color(value.trim());
        }

        let sync_root = root.clone();
        let sync_style = Rc::clone(&style);
        let style_sync = style.subscribe(move |_| sync_document(&sync_root, &sync_style));
        sync_document(&root, &style);

        let events = Rc::new(ViewportEvents::new());
        let target: &web_sys::EventTarget = window.as_ref();

        let scroll_window = window.clone();
        let scroll_events = Rc::clone(&events);
        let on_scroll = DomListener::attach(target, "scroll", move |_| {
            let y = scroll_window.scroll_y().unwrap_or(0.0);
            scroll_events.scroll.emit(&y);
        })?;

        let resize_window = window.clone();
        let resize_events = Rc::clone(&events);
        let on_resize = DomListener::attach(target, "resize", move |_| {
            resize_events.resize.emit(&window_size(&resize_window));
        })?;

        log::debug!("engine installed, theme {theme}");
        Ok(Self {
            host: Host {
                viewport: Rc::new(WindowViewport::new(window.clone())),
                events,
                style,
                scheduler: Rc::new(RafScheduler::new(window)),
                config: EngineConfig::default(),
            },
            config: Cell::new(EngineConfig::default()),
            _listeners: vec![on_scroll, on_resize],
            _style_sync: style_sync,
        })
    }

    /// Host for a new mount, carrying the current tuning.
    fn host(&self) -> Host {
        let mut host = self.host.clone();
        host.config = self.config.get();
        host
    }
}

/// Mirror the style store onto the root element.
fn sync_document(root: &HtmlElement, style: &StyleStore) {
    let css = root.style();
    for name in [PRIMARY_RGB, TEXT_ON_PRIMARY] {
        if let Some(value) = style.property(name)
            && let Err(e) = css.set_property(name, &value)
        {
            log::warn!("writing {name} failed: {e:?}");
        }
    }
    let light = style.theme() == Theme::Light;
    let _ = root
        .class_list()
        .toggle_with_force(LIGHT_MODE_CLASS, light);
}

/// Split a comma-separated tag list, dropping empty entries.
pub fn parse_tag_list(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Level name as accepted by [`init_logging`]; unknown names mean `warn`.
fn parse_level(level: &str) -> log::LevelFilter {
    level.trim().parse().unwrap_or(log::LevelFilter::Warn)
}

/// Route panics and `log` output to the browser console at `level`
/// (`error`, `warn`, `info`, `debug`, `trace`, `off`).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    console_error_panic_hook::set_once();
    let filter = parse_level(level);
    if let Some(level) = filter.to_level() {
        // A second call only adjusts the level below.
        let _ = console_log::init_with_level(level);
    }
    log::set_max_level(filter);
}

/// Replace the tuning used by later mounts with a JSON document. Missing
/// fields keep their defaults.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = EngineConfig::from_json(json).map_err(|e| js_err(e.to_string()))?;
    engine()?.config.set(config);
    Ok(())
}

/// A mounted effect. `unmount()` or `free()` stops it; until then the
/// animation keeps running.
#[wasm_bindgen]
pub struct EffectHandle {
    mounted: Option<Box<dyn Any>>,
}

#[wasm_bindgen]
impl EffectHandle {
    pub fn unmount(&mut self) {
        self.mounted = None;
    }

    /// `false` once unmounted, or when the target element was missing.
    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.mounted.is_some()
    }
}

impl EffectHandle {
    fn inactive() -> Self {
        Self { mounted: None }
    }
}

/// Start the wave background on the canvas with id `canvas_id`.
///
/// A missing element or a canvas without a 2D context leaves the page
/// without the effect; the returned handle is inactive.
#[wasm_bindgen]
pub fn mount_background(canvas_id: &str) -> Result<EffectHandle, JsValue> {
    let engine = engine()?;
    let document = document(&window()?)?;
    let surface = document
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .and_then(CanvasSurface::new);

    match mount_waveform(&engine.host(), surface) {
        Ok(mounted) => Ok(EffectHandle {
            mounted: Some(Box::new(mounted)),
        }),
        Err(_) => Ok(EffectHandle::inactive()),
    }
}

/// Fill the element with id `element_id` with two copies of `tags` and
/// start scrolling it.
#[wasm_bindgen]
pub fn mount_marquee(element_id: &str, tags: &str) -> Result<EffectHandle, JsValue> {
    let engine = engine()?;
    let document = document(&window()?)?;
    let Some(element) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        log::warn!("marquee: no element #{element_id}, effect disabled");
        return Ok(EffectHandle::inactive());
    };

    let strip = MarqueeStrip::new(parse_tag_list(tags));
    element.set_text_content(None);
    for item in strip.doubled() {
        let span = document.create_element("span")?;
        span.set_class_name("marquee-item");
        span.set_text_content(Some(item));
        element.append_child(&span)?;
    }

    match mount_marquee_effect(&engine.host(), strip, Some(ElementTransform::new(element))) {
        Ok(mounted) => Ok(EffectHandle {
            mounted: Some(Box::new(mounted)),
        }),
        Err(_) => Ok(EffectHandle::inactive()),
    }
}

/// Set the accent from an `"r, g, b"` string. Unparseable values are
/// stored but leave the rendered color unchanged.
#[wasm_bindgen]
pub fn set_primary_color(rgb: &str) -> Result<(), JsValue> {
    engine()?.host.style.set_primary_color(rgb);
    Ok(())
}

/// Switch between dark and light; returns the new theme name.
#[wasm_bindgen]
pub fn toggle_theme() -> Result<String, JsValue> {
    Ok(engine()?.host.style.toggle_theme().to_string())
}

/// Step through the current palette; returns the new accent's name.
#[wasm_bindgen]
pub fn cycle_accent(delta: i32) -> Result<String, JsValue> {
    Ok(engine()?.host.style.cycle_accent(delta as isize).name.to_string())
}

/// Library version.
#[wasm_bindgen]
pub fn version() -> String {
    wavedrift_core::VERSION.to_string()
}
