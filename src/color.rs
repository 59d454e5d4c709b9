use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9a-f]{3}|[0-9a-f]{6})$").unwrap());
static FUNCTIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$",
    )
    .unwrap()
});

const NAMED_COLORS: [(&str, Rgb); 19] = [
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("cyan", Rgb::new(0x00, 0xff, 0xff)),
    ("aqua", Rgb::new(0x00, 0xff, 0xff)),
    ("magenta", Rgb::new(0xff, 0x00, 0xff)),
    ("fuchsia", Rgb::new(0xff, 0x00, 0xff)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("grey", Rgb::new(0x80, 0x80, 0x80)),
    ("silver", Rgb::new(0xc0, 0xc0, 0xc0)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A paint value: either an opaque color or an opaque base with an alpha.
///
/// Composites are only ever produced by [`color_with_alpha`] (or by parsing
/// an `rgba(...)` string); nothing mutates an existing color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Solid(Rgb),
    Composite { base: Rgb, alpha: f64 },
}

impl Color {
    pub const WHITE: Color = Color::Solid(Rgb::new(0xff, 0xff, 0xff));
    pub const BLACK: Color = Color::Solid(Rgb::new(0x00, 0x00, 0x00));

    pub fn base(&self) -> Rgb {
        match *self {
            Color::Solid(rgb) => rgb,
            Color::Composite { base, .. } => base,
        }
    }

    pub fn alpha(&self) -> f64 {
        match *self {
            Color::Solid(_) => 1.0,
            Color::Composite { alpha, .. } => alpha,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Solid(Rgb { r, g, b }) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Color::Composite {
                base: Rgb { r, g, b },
                alpha,
            } => {
                // Shortest form that parses back to the same f64; `-0` prints as `0`.
                let alpha = if alpha == 0.0 { 0.0 } else { alpha };
                write!(f, "rgba({r}, {g}, {b}, {alpha})")
            }
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a hex (`#rgb`, `#rrggbb`, with or without `#`), functional
/// (`rgb()`/`rgba()`) or named color.
pub fn parse_color(input: &str) -> Result<Color> {
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(Error::InvalidColor("empty color".to_string()));
    }

    if let Some(caps) = HEX_RE.captures(&normalized) {
        let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Ok(Color::Solid(parse_hex_digits(digits)?));
    }

    if let Some(caps) = FUNCTIONAL_RE.captures(&normalized) {
        let channel = |idx: usize| -> Result<u8> {
            let raw = caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
            raw.parse::<u8>()
                .map_err(|_| Error::InvalidColor(format!("channel out of range in {input:?}")))
        };
        let base = Rgb::new(channel(1)?, channel(2)?, channel(3)?);
        let Some(alpha) = caps.get(4) else {
            return Ok(Color::Solid(base));
        };
        let alpha: f64 = alpha
            .as_str()
            .parse()
            .map_err(|_| Error::InvalidColor(format!("bad alpha in {input:?}")))?;
        return color_with_alpha(Color::Solid(base), alpha);
    }

    if normalized == "transparent" {
        return Ok(Color::Composite {
            base: Rgb::new(0, 0, 0),
            alpha: 0.0,
        });
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, rgb)| Color::Solid(*rgb))
        .ok_or_else(|| Error::InvalidColor(format!("unrecognized color {input:?}")))
}

fn parse_hex_digits(digits: &str) -> Result<Rgb> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|ch| [ch, ch]).collect()
    } else {
        digits.to_string()
    };
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| Error::InvalidColor(format!("bad hex digits {digits:?}")))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Returns `base` at the given opacity. The alpha applies to the base solid,
/// replacing any alpha the input already carried.
pub fn color_with_alpha(base: Color, alpha: f64) -> Result<Color> {
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidColor(format!("alpha {alpha} outside [0, 1]")));
    }
    let base = base.base();
    if alpha == 1.0 {
        return Ok(Color::Solid(base));
    }
    Ok(Color::Composite { base, alpha })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#ff8800").unwrap(), Color::Solid(Rgb::new(255, 136, 0)));
        assert_eq!(parse_color("F80").unwrap(), Color::Solid(Rgb::new(255, 136, 0)));
        assert_eq!(parse_color("  #FFFFFF ").unwrap(), Color::WHITE);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(parse_color("White").unwrap(), Color::WHITE);
        assert_eq!(parse_color("orange").unwrap().to_string(), "#ffa500");
        assert!(parse_color("transparent").unwrap().is_transparent());
    }

    #[test]
    fn rejects_unknown_input() {
        for input in ["", "#12", "#gggggg", "not-a-color", "rgb(300, 0, 0)", "rgba(1,2,3,1.5)"] {
            assert!(
                matches!(parse_color(input), Err(Error::InvalidColor(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn alpha_bounds_are_enforced() {
        assert!(color_with_alpha(Color::WHITE, -0.1).is_err());
        assert!(color_with_alpha(Color::WHITE, 1.01).is_err());
        assert!(color_with_alpha(Color::WHITE, f64::NAN).is_err());
    }

    #[test]
    fn alpha_extremes() {
        let accent = parse_color("#3366cc").unwrap();
        let clear = color_with_alpha(accent, 0.0).unwrap();
        assert!(clear.is_transparent());
        assert_eq!(clear.to_string(), "rgba(51, 102, 204, 0)");
        assert_eq!(color_with_alpha(accent, 1.0).unwrap(), accent);
    }

    #[test]
    fn composite_reparses_to_itself() {
        for name in ["#ffffff", "navy", "#0af"] {
            let base = parse_color(name).unwrap();
            let faded = color_with_alpha(base, 0.35).unwrap();
            let reparsed = parse_color(&faded.to_string()).unwrap();
            assert_eq!(reparsed, faded);
            assert_eq!(color_with_alpha(base, 0.35).unwrap(), faded);
        }
    }

    #[test]
    fn alpha_keeps_full_precision() {
        let base = parse_color("#3366cc").unwrap();
        let faded = color_with_alpha(base, 0.12345).unwrap();
        assert_eq!(faded.to_string(), "rgba(51, 102, 204, 0.12345)");
        assert_eq!(parse_color(&faded.to_string()).unwrap(), faded);
        assert_eq!(
            color_with_alpha(base, -0.0).unwrap().to_string(),
            "rgba(51, 102, 204, 0)"
        );
    }

    #[test]
    fn with_alpha_does_not_touch_input() {
        let base = parse_color("#102030").unwrap();
        let _ = color_with_alpha(base, 0.5).unwrap();
        assert_eq!(base.to_string(), "#102030");
    }
}
