//! Browser implementations of the engine's host seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlElement, Window,
};

use wavedrift_core::{
    FrameCallback, FrameHandle, FrameScheduler, Point, Rgb, Rgba, Size, Surface, TransformTarget,
    Viewport, css_transform,
};

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Viewport for WindowViewport {
    fn size(&self) -> Size {
        window_size(&self.window)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn now_ms(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }
}

pub fn window_size(window: &Window) -> Size {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

// ---------------------------------------------------------------------------
// requestAnimationFrame
// ---------------------------------------------------------------------------

/// Frame scheduler backed by `requestAnimationFrame`.
///
/// Callbacks live on the Rust side keyed by handle; the JS shim only carries
/// the key. Cancelling drops the callback (and whatever state it holds)
/// right away, the shim itself is freed by the browser never calling it.
pub struct RafScheduler {
    window: Window,
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<u64, (i32, FrameCallback)>>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let pending: Weak<RefCell<HashMap<u64, (i32, FrameCallback)>>> =
            Rc::downgrade(&self.pending);
        let shim = Closure::once_into_js(move |timestamp: f64| {
            let entry = pending.upgrade().and_then(|p| p.borrow_mut().remove(&id));
            if let Some((_, callback)) = entry {
                callback(timestamp);
            }
        });

        match self.window.request_animation_frame(shim.unchecked_ref()) {
            Ok(raf) => {
                self.pending.borrow_mut().insert(id, (raf, callback));
            }
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let entry = self.pending.borrow_mut().remove(&handle.0);
        if let Some((raf, _)) = entry {
            let _ = self.window.cancel_animation_frame(raf);
        }
    }
}

// ---------------------------------------------------------------------------
// DOM event listeners
// ---------------------------------------------------------------------------

/// An attached DOM listener, detached on drop.
pub struct DomListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

// ---------------------------------------------------------------------------
// Canvas surface
// ---------------------------------------------------------------------------

/// 2D canvas the wave background paints on.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn fill(&mut self, color: Rgb) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }
}

// ---------------------------------------------------------------------------
// Marquee element
// ---------------------------------------------------------------------------

/// The strip element, moved through its inline `transform`.
pub struct ElementTransform {
    element: HtmlElement,
}

impl ElementTransform {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl TransformTarget for ElementTransform {
    fn set_translate_x(&mut self, percent: f64) {
        if let Err(e) = self
            .element
            .style()
            .set_property("transform", &css_transform(percent))
        {
            log::warn!("marquee: transform write failed: {e:?}");
        }
    }
}
