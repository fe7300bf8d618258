//! Single-threaded notification channels with drop-to-unsubscribe handles.
//!
//! Listeners are stored behind `Rc` so `emit` can snapshot the list before
//! calling out; a listener may subscribe, unsubscribe or emit again while
//! being notified without tripping a `RefCell` borrow.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
}

/// A list of listeners for events of type `T`.
pub struct Emitter<T> {
    slots: Rc<Slots<T>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `listener`. It stays attached until the returned
    /// [`Subscription`] is dropped or cancelled.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        self.slots
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<Slots<T>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Notify every listener attached at the time of the call.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .slots
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.slots.listeners.borrow().len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposer for a listener or any other releasable resource.
///
/// Runs its release action exactly once: on [`Subscription::cancel`] or on
/// drop, whichever comes first.
#[must_use = "dropping a Subscription immediately releases it"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Viewport dimensions in CSS pixels (or terminal dots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Notifications a page-like host produces.
#[derive(Default)]
pub struct ViewportEvents {
    /// New viewport size.
    pub resize: Emitter<Size>,
    /// New vertical scroll offset.
    pub scroll: Emitter<f64>,
}

impl ViewportEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_all_listeners() {
        let emitter = Emitter::<i32>::new();
        let total = Rc::new(Cell::new(0));
        let t1 = Rc::clone(&total);
        let t2 = Rc::clone(&total);
        let _a = emitter.subscribe(move |v| t1.set(t1.get() + *v));
        let _b = emitter.subscribe(move |v| t2.set(t2.get() + *v * 10));
        emitter.emit(&2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = emitter.subscribe(move |_| h.set(h.get() + 1));
        emitter.emit(&());
        drop(sub);
        emitter.emit(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn cancel_detaches_once() {
        let emitter = Emitter::<()>::new();
        let sub = emitter.subscribe(|_| {});
        let _other = emitter.subscribe(|_| {});
        sub.cancel();
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn subscription_outliving_emitter_is_harmless() {
        let emitter = Emitter::<()>::new();
        let sub = emitter.subscribe(|_| {});
        drop(emitter);
        drop(sub);
    }

    #[test]
    fn listener_may_unsubscribe_during_emit() {
        let emitter = Rc::new(Emitter::<()>::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let slot_in = Rc::clone(&slot);
        let h = Rc::clone(&hits);
        let sub = emitter.subscribe(move |_| {
            h.set(h.get() + 1);
            slot_in.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        emitter.emit(&());
        emitter.emit(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_round() {
        let emitter = Rc::new(Emitter::<()>::new());
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let late_hits = Rc::new(Cell::new(0));

        let e = Rc::clone(&emitter);
        let held_in = Rc::clone(&held);
        let late = Rc::clone(&late_hits);
        let _first = emitter.subscribe(move |_| {
            let late = Rc::clone(&late);
            let sub = e.subscribe(move |_| late.set(late.get() + 1));
            held_in.borrow_mut().push(sub);
        });

        emitter.emit(&());
        assert_eq!(late_hits.get(), 0);
        emitter.emit(&());
        assert_eq!(late_hits.get(), 1);
    }
}
