//! Static font-metric tables used to measure and wrap text on the page.
//!
//! Widths are in em units, so a run's pixel width is `measure_str(s) * size_px`.
//! Tables cover ASCII 0x20..=0x7E (index = byte - 32); anything else measures as
//! the table's average character width. The rasterizer draws each glyph into
//! exactly this advance, so measured and painted text always agree.

use serde::{Deserialize, Serialize};

/// The metric families a design's font name can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Humanist sans-serif; the default for both templates.
    Sans,
    /// Old-style serif.
    Serif,
    /// Fixed-pitch; the Notion contact block and duration badges.
    Mono,
}

impl FontFamily {
    /// Maps a CSS-style family list (`"Georgia, serif"`) onto a metric table.
    /// The first recognizable entry wins; unknown lists fall back to `Sans`.
    pub fn from_css_name(name: &str) -> FontFamily {
        for part in name.split(',') {
            let family = part
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_ascii_lowercase();
            match family.as_str() {
                "sans-serif" | "ui-sans-serif" | "system-ui" | "inter" | "helvetica"
                | "arial" => return FontFamily::Sans,
                "serif" | "ui-serif" | "georgia" | "garamond" | "times new roman" => {
                    return FontFamily::Serif
                }
                "monospace" | "ui-monospace" | "menlo" | "courier" | "courier new" => {
                    return FontFamily::Mono
                }
                _ => {}
            }
        }
        FontFamily::Sans
    }

    pub fn metrics(self) -> &'static FontMetricTable {
        match self {
            FontFamily::Sans => &SANS_TABLE,
            FontFamily::Serif => &SERIF_TABLE,
            FontFamily::Mono => &MONO_TABLE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

pub struct FontMetricTable {
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Advance width of one character in em units.
    pub fn advance(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.advance(c)).sum()
    }

    /// Greedy word wrap at `max_width_em`.
    ///
    /// Explicit newlines start a new line and empty paragraphs are kept as blank
    /// lines. A single word wider than the line stays whole on its own line.
    /// Blank input yields no lines.
    pub fn wrap(&self, text: &str, max_width_em: f32) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let mut lines = Vec::new();
        for paragraph in text.trim_end().split('\n') {
            let mut current = String::new();
            let mut current_width = 0.0_f32;
            for word in paragraph.split_whitespace() {
                let word_width = self.measure_str(word);
                if current.is_empty() {
                    current.push_str(word);
                    current_width = word_width;
                } else if current_width + self.space_width + word_width > max_width_em {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_width += self.space_width + word_width;
                }
            }
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static SANS_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

static SERIF_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.21, 0.26, 0.32, 0.48, 0.48, 0.76, 0.57, 0.19, 0.28, 0.28, 0.33, 0.50, 0.24, 0.28, 0.24, 0.26,
        // 0     1     2     3     4     5     6     7     8     9
        0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48,
        // :     ;     <     =     >     ?     @
        0.24, 0.24, 0.50, 0.50, 0.50, 0.43, 0.87,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.57, 0.52, 0.52, 0.57, 0.48, 0.43, 0.57, 0.57, 0.21, 0.33, 0.52, 0.45, 0.66,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.57, 0.61, 0.48, 0.61, 0.52, 0.43, 0.48, 0.57, 0.57, 0.76, 0.52, 0.52, 0.48,
        // [     \     ]     ^     _     `
        0.24, 0.26, 0.24, 0.40, 0.48, 0.29,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.48, 0.48, 0.43, 0.48, 0.48, 0.26, 0.48, 0.48, 0.19, 0.19, 0.45, 0.19, 0.71,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.48, 0.48, 0.48, 0.48, 0.28, 0.37, 0.33, 0.48, 0.43, 0.61, 0.43, 0.43, 0.37,
        // {     |     }     ~
        0.28, 0.22, 0.28, 0.50,
    ],
    average_char_width: 0.44,
    space_width: 0.21,
};

static MONO_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.60; 95],
    average_char_width: 0.60,
    space_width: 0.60,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(FontFamily::Sans.metrics().measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = FontFamily::Sans.metrics().measure_str("Rust");
        assert!((width - 2.00).abs() < 1e-3, "Rust width should be ~2.00, got {width}");
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = FontFamily::Serif.metrics();
        assert!((metrics.measure_str("é") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_mono_is_fixed_pitch() {
        let metrics = FontFamily::Mono.metrics();
        assert_eq!(metrics.measure_str("iiii"), metrics.measure_str("WWWW"));
    }

    #[test]
    fn test_css_name_mapping() {
        assert_eq!(FontFamily::from_css_name("sans-serif"), FontFamily::Sans);
        assert_eq!(FontFamily::from_css_name("'Georgia', serif"), FontFamily::Serif);
        assert_eq!(FontFamily::from_css_name("Fancy, monospace"), FontFamily::Mono);
        assert_eq!(FontFamily::from_css_name("Unknown Display"), FontFamily::Sans);
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = FontFamily::Sans.metrics().wrap("Product Designer", 40.0);
        assert_eq!(lines, vec!["Product Designer".to_string()]);
    }

    #[test]
    fn test_wrap_long_text_respects_width() {
        let metrics = FontFamily::Sans.metrics();
        let text = "Led the redesign of the core product dashboard, improving user retention \
                    by 15% across every market the company operates in";
        let lines = metrics.wrap(text, 12.0);
        assert!(lines.len() > 2, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(metrics.measure_str(line) <= 12.0 + 1e-3, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let lines = FontFamily::Sans.metrics().wrap("first\n\nthird", 40.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrap_blank_input_has_no_lines() {
        assert!(FontFamily::Sans.metrics().wrap("  \n ", 40.0).is_empty());
    }

    #[test]
    fn test_overlong_word_stays_whole() {
        let lines = FontFamily::Sans.metrics().wrap("supercalifragilistic", 2.0);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }
}
