//! Shared style state: accent color, contrast text, theme.
//!
//! Stands in for the page's root-level CSS custom properties. Writers go
//! through [`StyleStore::set_primary_color`] / [`StyleStore::toggle_theme`],
//! readers either query [`StyleStore::property`] or subscribe to palette
//! changes and re-read on notification.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::color::Rgb;
use crate::events::{Emitter, Subscription};
use crate::palette::{NamedColor, Theme};

/// Accent color as `"r, g, b"`.
pub const PRIMARY_RGB: &str = "--primary-rgb";
/// Readable text color on the accent, as `"r g b"`.
pub const TEXT_ON_PRIMARY: &str = "--text-on-primary";

/// Emitted after every accent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteChanged;

pub struct StyleStore {
    properties: RefCell<BTreeMap<String, String>>,
    theme: Cell<Theme>,
    palette_changed: Emitter<PaletteChanged>,
}

impl StyleStore {
    /// Empty store in the dark theme. No accent is set, so renderers use
    /// their fallback color until one is written.
    pub fn new() -> Self {
        Self {
            properties: RefCell::new(BTreeMap::new()),
            theme: Cell::new(Theme::Dark),
            palette_changed: Emitter::new(),
        }
    }

    /// Store seeded with the first accent of `theme`'s palette.
    pub fn with_theme(theme: Theme) -> Self {
        let store = Self::new();
        store.theme.set(theme);
        store.write_primary(&theme.palette()[0].rgb.to_string());
        store
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    /// Raw property write; does not notify.
    pub fn set_property(&self, name: &str, value: impl Into<String>) {
        self.properties
            .borrow_mut()
            .insert(name.to_string(), value.into());
    }

    /// Set the accent from an `"r, g, b"` string and notify subscribers.
    ///
    /// The string is stored verbatim. When it parses, `--text-on-primary`
    /// is updated to match; malformed input leaves it alone. Subscribers are
    /// notified either way and decide for themselves what to do with a value
    /// they cannot read.
    pub fn set_primary_color(&self, rgb: &str) {
        self.write_primary(rgb);
        log::debug!("primary color set to '{rgb}'");
        self.palette_changed.emit(&PaletteChanged);
    }

    pub fn set_primary(&self, color: Rgb) {
        self.set_primary_color(&color.to_string());
    }

    fn write_primary(&self, rgb: &str) {
        self.set_property(PRIMARY_RGB, rgb.trim());
        match Rgb::parse_triple(rgb) {
            Some(color) => {
                self.set_property(TEXT_ON_PRIMARY, color.contrast_text().to_space_separated())
            }
            None => log::warn!("ignoring contrast update for malformed color '{rgb}'"),
        }
    }

    /// Parsed accent, if one is set and well formed.
    pub fn primary(&self) -> Option<Rgb> {
        self.property(PRIMARY_RGB)
            .and_then(|v| Rgb::parse_triple(&v))
    }

    pub fn text_on_primary(&self) -> Option<String> {
        self.property(TEXT_ON_PRIMARY)
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// Current page background (read by the wave renderer every frame).
    pub fn background(&self) -> Rgb {
        self.theme.get().background()
    }

    /// Flip between dark and light, carrying the accent over to its
    /// counterpart in the other palette (first entry if it has none).
    pub fn toggle_theme(&self) -> Theme {
        let current = self.theme.get();
        let accent = self.primary().unwrap_or(current.palette()[0].rgb);
        let NamedColor { name, rgb } = current.counterpart(accent);
        let next = current.toggled();
        self.theme.set(next);
        log::debug!("theme {current} -> {next}, accent -> {name}");
        self.set_primary(rgb);
        next
    }

    /// Step through the current palette by `delta` entries, wrapping.
    pub fn cycle_accent(&self, delta: isize) -> NamedColor {
        let palette = self.theme.get().palette();
        let len = palette.len() as isize;
        let current = self
            .primary()
            .and_then(|c| self.theme.get().index_of(c))
            .map(|i| i as isize)
            .unwrap_or(if delta >= 0 { -1 } else { 0 });
        let next = palette[(current + delta).rem_euclid(len) as usize];
        self.set_primary(next.rgb);
        next
    }

    pub fn subscribe(&self, listener: impl Fn(&PaletteChanged) + 'static) -> Subscription {
        self.palette_changed.subscribe(listener)
    }

    pub fn subscriber_count(&self) -> usize {
        self.palette_changed.listener_count()
    }
}

impl Default for StyleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BRIGHT, MUTED};
    use std::rc::Rc;

    #[test]
    fn new_store_has_no_accent() {
        let store = StyleStore::new();
        assert_eq!(store.primary(), None);
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn with_theme_seeds_first_accent() {
        let store = StyleStore::with_theme(Theme::Light);
        assert_eq!(store.primary(), Some(BRIGHT[0].rgb));
        assert_eq!(store.background(), Rgb::WHITE);
        assert_eq!(store.text_on_primary().as_deref(), Some("255 255 255"));
    }

    #[test]
    fn set_primary_writes_contrast_and_notifies() {
        let store = StyleStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| h.set(h.get() + 1));

        store.set_primary_color("235, 235, 235");
        assert_eq!(store.primary(), Some(Rgb::new(235, 235, 235)));
        assert_eq!(store.text_on_primary().as_deref(), Some("0 0 0"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn malformed_primary_still_notifies_but_keeps_contrast() {
        let store = StyleStore::new();
        store.set_primary_color("0, 0, 0");
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| h.set(h.get() + 1));

        store.set_primary_color("abc");
        assert_eq!(store.property(PRIMARY_RGB).as_deref(), Some("abc"));
        assert_eq!(store.primary(), None);
        assert_eq!(store.text_on_primary().as_deref(), Some("255 255 255"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn toggle_carries_accent_to_counterpart() {
        let store = StyleStore::new();
        store.set_primary(MUTED[5].rgb);
        assert_eq!(store.toggle_theme(), Theme::Light);
        assert_eq!(store.primary(), Some(BRIGHT[5].rgb));
        assert_eq!(store.toggle_theme(), Theme::Dark);
        assert_eq!(store.primary(), Some(MUTED[5].rgb));
    }

    #[test]
    fn toggle_with_foreign_accent_falls_back_to_first() {
        let store = StyleStore::new();
        store.set_primary_color("1, 2, 3");
        store.toggle_theme();
        assert_eq!(store.primary(), Some(BRIGHT[0].rgb));
    }

    #[test]
    fn toggle_notifies_subscribers() {
        let store = StyleStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = store.subscribe(move |_| h.set(h.get() + 1));
        store.toggle_theme();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn cycle_accent_wraps() {
        let store = StyleStore::new();
        assert_eq!(store.cycle_accent(1), MUTED[0]);
        assert_eq!(store.cycle_accent(1), MUTED[1]);
        assert_eq!(store.cycle_accent(-2), MUTED[9]);
        assert_eq!(store.cycle_accent(1), MUTED[0]);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = StyleStore::new();
        let sub = store.subscribe(|_| {});
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
