//! Frame scheduling and the self-rescheduling animation loop.
//!
//! Hosts provide a [`FrameScheduler`] (`requestAnimationFrame` in the
//! browser, a polled [`ManualScheduler`] in the terminal and in tests).
//! [`AnimationLoop`] drives a [`FrameEffect`] through it: run a frame, ask for
//! the next one, repeat until stopped.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

pub trait FrameScheduler {
    /// Run `callback` once on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

// ---------------------------------------------------------------------------
// Manual scheduler
// ---------------------------------------------------------------------------

/// Scheduler whose frames fire only when the owner calls [`run_frame`].
///
/// [`run_frame`]: ManualScheduler::run_frame
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<u64>,
    pending: RefCell<BTreeMap<FrameHandle, FrameCallback>>,
    frames_run: Cell<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every callback that was pending when the call started, in
    /// request order. Requests made by those callbacks wait for the next
    /// call. Returns how many callbacks ran.
    pub fn run_frame(&self, timestamp_ms: f64) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let n = batch.len();
        for (_, callback) in batch {
            callback(timestamp_ms);
        }
        self.frames_run.set(self.frames_run.get() + 1);
        n
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.pending.borrow_mut().insert(handle, callback);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(&handle);
    }
}

// ---------------------------------------------------------------------------
// Animation loop
// ---------------------------------------------------------------------------

/// Something redrawn once per frame.
pub trait FrameEffect {
    fn frame(&mut self, timestamp_ms: f64);
}

struct LoopState {
    scheduler: Rc<dyn FrameScheduler>,
    pending: Cell<Option<FrameHandle>>,
    running: Cell<bool>,
}

/// Keeps an effect ticking until stopped or dropped.
pub struct AnimationLoop {
    state: Rc<LoopState>,
}

impl AnimationLoop {
    /// Run one frame immediately, then keep requesting frames.
    pub fn start<E: FrameEffect + 'static>(
        scheduler: Rc<dyn FrameScheduler>,
        effect: Rc<RefCell<E>>,
        now_ms: f64,
    ) -> Self {
        let state = Rc::new(LoopState {
            scheduler,
            pending: Cell::new(None),
            running: Cell::new(true),
        });
        tick(&state, &effect, now_ms);
        Self { state }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Cancel the pending frame. Idempotent.
    pub fn stop(&self) {
        if !self.state.running.replace(false) {
            return;
        }
        if let Some(handle) = self.state.pending.take() {
            self.state.scheduler.cancel_frame(handle);
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick<E: FrameEffect + 'static>(state: &Rc<LoopState>, effect: &Rc<RefCell<E>>, now_ms: f64) {
    // A callback can already be in a ManualScheduler batch when stop() runs.
    if !state.running.get() {
        return;
    }
    effect.borrow_mut().frame(now_ms);
    if !state.running.get() {
        return;
    }

    let next_state = Rc::clone(state);
    let next_effect = Rc::clone(effect);
    let handle = state.scheduler.request_frame(Box::new(move |ts| {
        next_state.pending.set(None);
        tick(&next_state, &next_effect, ts);
    }));
    state.pending.set(Some(handle));
}
