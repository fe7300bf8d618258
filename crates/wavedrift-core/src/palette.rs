//! Fixed accent palettes and the light/dark theme they belong to.
//!
//! The two palettes are index-aligned: entry `i` of the muted (dark theme)
//! palette is the counterpart of entry `i` of the bright (light theme)
//! palette, which is what lets a theme toggle keep the "same" accent.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// A named accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: Rgb,
}

const fn named(name: &'static str, r: u8, g: u8, b: u8) -> NamedColor {
    NamedColor {
        name,
        rgb: Rgb::new(r, g, b),
    }
}

/// Accents tuned for a black background.
pub const MUTED: [NamedColor; 10] = [
    named("Muted Violet", 170, 150, 210),
    named("Muted Emerald", 140, 200, 180),
    named("Muted Red", 220, 120, 120),
    named("Muted Yellow", 220, 200, 100),
    named("Muted White", 235, 235, 235),
    named("Muted Blue", 160, 185, 235),
    named("Muted Lime", 190, 210, 120),
    named("Muted Orange", 210, 150, 110),
    named("Muted Pink", 220, 150, 175),
    named("Muted Turquoise", 160, 220, 210),
];

/// Accents tuned for a white background.
pub const BRIGHT: [NamedColor; 10] = [
    named("Vivid Violet", 90, 50, 170),
    named("Emerald Green", 0, 100, 70),
    named("Crimson Red", 150, 20, 30),
    named("Golden Yellow", 170, 130, 10),
    named("Muted Black", 0, 0, 0),
    named("Electric Blue", 20, 70, 170),
    named("Lime Green", 80, 140, 20),
    named("Vivid Orange", 160, 80, 10),
    named("Hot Pink", 170, 20, 100),
    named("Bright Turquoise", 0, 120, 110),
];

/// Page theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Accent palette offered under this theme.
    pub fn palette(self) -> &'static [NamedColor] {
        match self {
            Self::Dark => &MUTED,
            Self::Light => &BRIGHT,
        }
    }

    /// Page background the wave is painted over.
    pub fn background(self) -> Rgb {
        match self {
            Self::Dark => Rgb::BLACK,
            Self::Light => Rgb::WHITE,
        }
    }

    /// Position of `rgb` in this theme's palette, if present.
    pub fn index_of(self, rgb: Rgb) -> Option<usize> {
        self.palette().iter().position(|c| c.rgb == rgb)
    }

    /// Counterpart of `rgb` (taken from this theme's palette) in the other
    /// theme's palette. Unknown colors map to the first entry.
    pub fn counterpart(self, rgb: Rgb) -> NamedColor {
        let target = self.toggled().palette();
        let index = self.index_of(rgb).unwrap_or(0);
        target[index]
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

/// Case-insensitive lookup across both palettes.
pub fn find_by_name(name: &str) -> Option<NamedColor> {
    MUTED
        .iter()
        .chain(BRIGHT.iter())
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}
