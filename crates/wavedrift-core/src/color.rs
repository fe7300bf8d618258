//! RGB triples, `"r, g, b"` parsing, and the contrast-text rule.

use serde::{Deserialize, Serialize};

/// An opaque color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS-variable style triple such as `"170, 150, 210"`.
    ///
    /// Exactly three comma-separated parts are required. Each part is read
    /// like JavaScript's `parseInt`: an optional sign and the leading digits,
    /// ignoring whatever follows (`"20.9"` is 20, `"12px"` is 12). Channels
    /// are clamped into `0..=255`. Wrong arity or a part without leading
    /// digits yields `None`.
    pub fn parse_triple(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let mut channels = [0u8; 3];
        let mut count = 0;
        for part in text.split(',') {
            if count == 3 {
                return None;
            }
            let value = leading_int(part)?;
            channels[count] = value.clamp(0, 255) as u8;
            count += 1;
        }
        if count != 3 {
            return None;
        }
        Some(Self::new(channels[0], channels[1], channels[2]))
    }

    /// Perceived brightness, `round((r*299 + g*587 + b*114) / 1000)`.
    pub fn brightness(self) -> u8 {
        let weighted = self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114;
        ((weighted as f64) / 1000.0).round() as u8
    }

    /// Text color that stays readable on top of `self`.
    pub fn contrast_text(self) -> Self {
        if self.brightness() > 125 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    /// Space-separated form used for `--text-on-primary` (`"0 0 0"`).
    pub fn to_space_separated(self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Composite `self` at `alpha` over `background`.
    pub fn blend_over(self, background: Rgb, alpha: f64) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// `"r, g, b"`, the format stored in `--primary-rgb`.
impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

/// A color plus stroke opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

/// Optional sign plus leading decimal digits; the rest is ignored.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        seen = true;
    }
    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_triples() {
        assert_eq!(Rgb::parse_triple("170, 150, 210"), Some(Rgb::new(170, 150, 210)));
        assert_eq!(Rgb::parse_triple("0,0,0"), Some(Rgb::BLACK));
        assert_eq!(Rgb::parse_triple("  1 ,2,  3 "), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "abc", "1,2", "1,2,3,4", "1,,3", "1,two,3", ".5,2,3", "-,2,3"] {
            assert_eq!(Rgb::parse_triple(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn parse_reads_leading_digits_of_each_part() {
        assert_eq!(Rgb::parse_triple("20.9, 70, 170"), Some(Rgb::new(20, 70, 170)));
        assert_eq!(Rgb::parse_triple("1.5,2,3"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse_triple("12px, +40, 7e2"), Some(Rgb::new(12, 40, 7)));
        assert_eq!(Rgb::parse_triple("99999999999999999999999, 0, 0"), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn parse_clamps_out_of_range_channels() {
        assert_eq!(Rgb::parse_triple("300, -4, 12"), Some(Rgb::new(255, 0, 12)));
    }

    #[test]
    fn display_matches_variable_format() {
        let c = Rgb::new(90, 50, 170);
        assert_eq!(c.to_string(), "90, 50, 170");
        assert_eq!(Rgb::parse_triple(&c.to_string()), Some(c));
    }

    #[test]
    fn brightness_and_contrast() {
        assert_eq!(Rgb::WHITE.brightness(), 255);
        assert_eq!(Rgb::BLACK.brightness(), 0);
        // Muted Violet: (170*299 + 150*587 + 210*114) / 1000 = 162.82
        assert_eq!(Rgb::new(170, 150, 210).brightness(), 163);
        assert_eq!(Rgb::new(170, 150, 210).contrast_text(), Rgb::BLACK);
        // Vivid Violet: 75.64
        assert_eq!(Rgb::new(90, 50, 170).contrast_text(), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.contrast_text().to_space_separated(), "255 255 255");
    }

    #[test]
    fn blend_endpoints() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(c.blend_over(Rgb::BLACK, 1.0), c);
        assert_eq!(c.blend_over(Rgb::WHITE, 0.0), Rgb::WHITE);
        assert_eq!(c.blend_over(Rgb::BLACK, 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn css_strings() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(c.to_css(), "rgb(1, 2, 3)");
        assert_eq!(c.with_alpha(0.25).to_css(), "rgba(1, 2, 3, 0.25)");
        assert_eq!(c.with_alpha(3.0).alpha, 1.0);
    }
}
