//! Page Fill Analysis — how much of the fixed page the rendered content uses.
//!
//! The page never grows: content past the bottom edge is clipped. This module reports
//! the fill so the editor can suggest a typography change.
//!
//! # Page fill rules
//! - Whitespace > 8%  → room to enlarge type or loosen spacing
//! - Overflow ≤ 5%    → tighten line spacing
//! - Overflow > 5%    → reduce font size

use serde::{Deserialize, Serialize};

use crate::models::design::{LayoutConfig, FONT_SIZE_RANGE, LINE_SPACING_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// 92–100% fill.
    Acceptable,
    /// < 92% fill.
    TooMuchWhitespace,
    /// 100–105% fill — the last lines are clipped.
    MinorOverflow,
    /// > 105% fill.
    MajorOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFillAnalysis {
    pub used_height: f32,
    pub available_height: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

impl PageFillAnalysis {
    pub fn overflows(&self) -> bool {
        self.overflow_fraction > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FillAction {
    IncreaseFontSize { to: f32 },
    LoosenSpacing { to: f32 },
    TightenSpacing { to: f32 },
    ReduceFontSize { to: f32 },
    NoAction,
}

const FONT_STEP: f32 = 0.5;
const SPACING_STEP: f32 = 0.1;

/// Classifies how far down the page the content reaches.
pub fn analyze_page_fill(content_bottom: f32, page_height: f32) -> PageFillAnalysis {
    let used_height = content_bottom.max(0.0);
    let fill_ratio = if page_height > 0.0 {
        used_height / page_height
    } else {
        0.0
    };

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if fill_ratio > 1.05 {
        PageFillVerdict::MajorOverflow
    } else if fill_ratio > 1.00 {
        PageFillVerdict::MinorOverflow
    } else if whitespace_fraction > 0.08 {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        used_height,
        available_height: page_height,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

/// Suggests one typography step that moves the page towards an acceptable fill,
/// staying inside the allowed layout ranges.
pub fn recommend_fill_action(analysis: &PageFillAnalysis, layout: &LayoutConfig) -> FillAction {
    let font_size = layout.font_size();
    let spacing = layout.line_spacing();
    match analysis.verdict {
        PageFillVerdict::Acceptable => FillAction::NoAction,
        PageFillVerdict::TooMuchWhitespace => {
            if font_size < *FONT_SIZE_RANGE.end() {
                FillAction::IncreaseFontSize {
                    to: (font_size + FONT_STEP).min(*FONT_SIZE_RANGE.end()),
                }
            } else if spacing < *LINE_SPACING_RANGE.end() {
                FillAction::LoosenSpacing {
                    to: round_tenth(spacing + SPACING_STEP).min(*LINE_SPACING_RANGE.end()),
                }
            } else {
                FillAction::NoAction
            }
        }
        PageFillVerdict::MinorOverflow => {
            if spacing > *LINE_SPACING_RANGE.start() {
                FillAction::TightenSpacing {
                    to: round_tenth(spacing - SPACING_STEP).max(*LINE_SPACING_RANGE.start()),
                }
            } else {
                reduce_font(font_size)
            }
        }
        PageFillVerdict::MajorOverflow => reduce_font(font_size),
    }
}

fn reduce_font(font_size: f32) -> FillAction {
    if font_size > *FONT_SIZE_RANGE.start() {
        FillAction::ReduceFontSize {
            to: (font_size - FONT_STEP).max(*FONT_SIZE_RANGE.start()),
        }
    } else {
        FillAction::NoAction
    }
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
