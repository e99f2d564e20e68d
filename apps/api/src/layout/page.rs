//! The fixed A4 page and the primitive nodes a rendered resume is made of.

use serde::Serialize;

use crate::layout::font_metrics::FontFamily;
use crate::layout::page_fill::PageFillAnalysis;
use crate::models::design::{Rgb, TemplateKind};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// A4 in CSS pixels (96 px per inch), rounded to whole pixels.
pub const PAGE_WIDTH_PX: f32 = 794.0;
pub const PAGE_HEIGHT_PX: f32 = 1123.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: FontFamily,
    /// Font size in CSS pixels.
    pub size: f32,
    pub weight: FontWeight,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(font: FontFamily, size: f32, color: Rgb) -> Self {
        Self {
            font,
            size,
            weight: FontWeight::Regular,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    /// Width of `text` in pixels at this style.
    pub fn measure(&self, text: &str) -> f32 {
        self.font.metrics().measure_str(text) * self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageClip {
    Rounded,
    Circle,
}

/// One drawing primitive, in page pixels with the origin at the top-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Rect {
        frame: Rect,
        fill: Rgb,
        radius: f32,
    },
    /// A single line of text; `frame.height` is the line box, glyphs are centered in it.
    Text {
        frame: Rect,
        text: String,
        style: TextStyle,
    },
    /// An embedded image. `source` is passed through untouched from the document.
    Image {
        frame: Rect,
        source: String,
        clip: ImageClip,
    },
}

/// Sections that can get a heading on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Experience,
    Projects,
    Education,
    Skills,
}

/// A fully laid-out page. This is the preview surface the export pipeline captures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub template: TemplateKind,
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub nodes: Vec<Node>,
    /// Headings in the order they were emitted.
    pub sections: Vec<SectionKind>,
    pub fill: PageFillAnalysis,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
