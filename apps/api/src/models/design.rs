use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
#[error("invalid color '{0}': expected #rrggbb or #rgb")]
pub struct ColorParseError(pub String);

/// An opaque sRGB color. Wire form is a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or the `#rgb` shorthand (the leading `#` is optional).
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(input.to_string());
        let hex = input.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let expanded: String = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(err()),
        };
        let channel =
            |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| err());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear blend towards white; `amount` 0.0 keeps the color, 1.0 yields white.
    pub fn tint(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Accent colors offered by the design panel.
pub const ACCENT_PALETTE: [Rgb; 5] = [
    Rgb::new(0x25, 0x63, 0xeb),
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0x16, 0xa3, 0x4a),
    Rgb::new(0x93, 0x33, 0xea),
    Rgb::new(0xea, 0x58, 0x0c),
];

// ────────────────────────────────────────────────────────────────────────────
// Design config
// ────────────────────────────────────────────────────────────────────────────

/// The visual strategy used to lay out the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Notion,
    Modern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignConfig {
    pub template: TemplateKind,
    pub accent_color: Rgb,
    /// CSS-style family name, e.g. `sans-serif`, `Georgia, serif`, `monospace`.
    pub font: String,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            template: TemplateKind::Notion,
            accent_color: ACCENT_PALETTE[0],
            font: "sans-serif".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout config
// ────────────────────────────────────────────────────────────────────────────

pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 12.0..=18.0;
pub const LINE_SPACING_RANGE: RangeInclusive<f32> = 1.0..=2.0;

const DEFAULT_FONT_SIZE: f32 = 14.0;
const DEFAULT_LINE_SPACING: f32 = 1.5;

/// Typographic parameters applied uniformly to the whole page.
/// Always within `FONT_SIZE_RANGE` / `LINE_SPACING_RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayoutConfigRepr", rename_all = "camelCase")]
pub struct LayoutConfig {
    font_size: f32,
    line_spacing: f32,
}

impl LayoutConfig {
    /// Clamps both values into range. Non-finite input falls back to the default.
    pub fn new(font_size: f32, line_spacing: f32) -> Self {
        Self {
            font_size: clamp_or(font_size, FONT_SIZE_RANGE, DEFAULT_FONT_SIZE),
            line_spacing: clamp_or(line_spacing, LINE_SPACING_RANGE, DEFAULT_LINE_SPACING),
        }
    }

    /// Base font size in CSS pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE, DEFAULT_LINE_SPACING)
    }
}

fn clamp_or(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LayoutConfigRepr {
    font_size: f32,
    line_spacing: f32,
}

impl Default for LayoutConfigRepr {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl From<LayoutConfigRepr> for LayoutConfig {
    fn from(repr: LayoutConfigRepr) -> Self {
        LayoutConfig::new(repr.font_size, repr.line_spacing)
    }
}
