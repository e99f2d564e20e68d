//! Shared drawing helpers for the templates: a node sink plus column-based text flow.

use crate::layout::page_fill::analyze_page_fill;
use crate::layout::{ImageClip, Node, PageLayout, Rect, SectionKind, TextStyle};
use crate::layout::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};
use crate::models::design::{LayoutConfig, Rgb, TemplateKind};

/// A vertical strip of the page that text flows down.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub x: f32,
    pub width: f32,
    pub y: f32,
}

impl Column {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, width, y }
    }

    pub fn gap(&mut self, dy: f32) {
        self.y += dy;
    }

    /// The same column narrowed by `left` pixels.
    pub fn indented(&self, left: f32) -> Column {
        Column::new(self.x + left, self.y, (self.width - left).max(0.0))
    }
}

pub(crate) struct Canvas {
    nodes: Vec<Node>,
    sections: Vec<SectionKind>,
    base_size: f32,
    line_spacing: f32,
}

impl Canvas {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            sections: Vec::new(),
            base_size: layout.font_size(),
            line_spacing: layout.line_spacing(),
        }
    }

    /// `factor` × the configured base font size.
    pub fn em(&self, factor: f32) -> f32 {
        self.base_size * factor
    }

    pub fn line_height(&self, style: &TextStyle) -> f32 {
        style.size * self.line_spacing
    }

    pub fn rect(&mut self, frame: Rect, fill: Rgb) {
        self.rounded_rect(frame, fill, 0.0);
    }

    pub fn rounded_rect(&mut self, frame: Rect, fill: Rgb, radius: f32) {
        self.nodes.push(Node::Rect {
            frame,
            fill,
            radius,
        });
    }

    /// A filled rectangle with a 1px border, drawn as two nested rects.
    pub fn bordered_rect(&mut self, frame: Rect, fill: Rgb, border: Rgb, radius: f32) {
        self.rounded_rect(frame, border, radius);
        let inner = Rect::new(
            frame.x + 1.0,
            frame.y + 1.0,
            (frame.width - 2.0).max(0.0),
            (frame.height - 2.0).max(0.0),
        );
        self.rounded_rect(inner, fill, (radius - 1.0).max(0.0));
    }

    pub fn image(&mut self, frame: Rect, source: &str, clip: ImageClip) {
        self.nodes.push(Node::Image {
            frame,
            source: source.to_string(),
            clip,
        });
    }

    /// One unwrapped line with its top-left at `(x, y)`. Returns the line's frame.
    pub fn text_line(&mut self, x: f32, y: f32, text: &str, style: TextStyle) -> Rect {
        let frame = Rect::new(x, y, style.measure(text), self.line_height(&style));
        if !text.is_empty() {
            self.nodes.push(Node::Text {
                frame,
                text: text.to_string(),
                style,
            });
        }
        frame
    }

    /// Word-wraps `text` into the column and advances it. Returns the height used.
    pub fn paragraph(&mut self, col: &mut Column, text: &str, style: TextStyle) -> f32 {
        let max_em = if style.size > 0.0 {
            col.width / style.size
        } else {
            0.0
        };
        let line_height = self.line_height(&style);
        let start = col.y;
        for line in style.font.metrics().wrap(text, max_em) {
            self.text_line(col.x, col.y, &line, style);
            col.y += line_height;
        }
        col.y - start
    }

    /// Lays out pill-shaped tags left to right, wrapping rows inside the column.
    /// Returns the height used.
    pub fn chips(&mut self, col: &mut Column, labels: &[&str], chip: ChipStyle) -> f32 {
        let widths: Vec<f32> = labels
            .iter()
            .map(|label| chip.text.measure(label) + chip.pad_x * 2.0)
            .collect();
        let chip_height = self.line_height(&chip.text) + chip.pad_y * 2.0;
        let positions = flow(&widths, col.width, chip.gap, chip_height);
        let start = col.y;
        let mut bottom = col.y;
        for ((label, width), (dx, dy)) in labels.iter().zip(&widths).zip(&positions) {
            let frame = Rect::new(col.x + dx, col.y + dy, *width, chip_height);
            match chip.border {
                Some(border) => self.bordered_rect(frame, chip.fill, border, chip.radius),
                None => self.rounded_rect(frame, chip.fill, chip.radius),
            }
            self.text_line(frame.x + chip.pad_x, frame.y + chip.pad_y, label, chip.text);
            bottom = bottom.max(frame.bottom());
        }
        col.y = bottom;
        col.y - start
    }

    pub fn mark_section(&mut self, kind: SectionKind) {
        self.sections.push(kind);
    }

    pub fn finish(self, template: TemplateKind, content_bottom: f32) -> PageLayout {
        PageLayout {
            template,
            width: PAGE_WIDTH_PX,
            height: PAGE_HEIGHT_PX,
            background: Rgb::WHITE,
            nodes: self.nodes,
            sections: self.sections,
            fill: analyze_page_fill(content_bottom, PAGE_HEIGHT_PX),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ChipStyle {
    pub text: TextStyle,
    pub fill: Rgb,
    pub border: Option<Rgb>,
    pub radius: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub gap: f32,
}

/// Offsets for boxes of the given widths flowed into rows of `max_width`.
/// A box wider than the row still gets a row of its own.
pub(crate) fn flow(widths: &[f32], max_width: f32, gap: f32, row_height: f32) -> Vec<(f32, f32)> {
    let mut positions = Vec::with_capacity(widths.len());
    let (mut x, mut y) = (0.0_f32, 0.0_f32);
    for &width in widths {
        if x > 0.0 && x + width > max_width {
            x = 0.0;
            y += row_height + gap;
        }
        positions.push((x, y));
        x += width + gap;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontFamily;

    #[test]
    fn test_flow_wraps_rows() {
        let positions = flow(&[40.0, 40.0, 40.0], 100.0, 10.0, 20.0);
        assert_eq!(positions, vec![(0.0, 0.0), (50.0, 0.0), (0.0, 30.0)]);
    }

    #[test]
    fn test_flow_oversized_box_gets_own_row() {
        let positions = flow(&[150.0, 10.0], 100.0, 5.0, 20.0);
        assert_eq!(positions, vec![(0.0, 0.0), (0.0, 25.0)]);
    }

    #[test]
    fn test_paragraph_advances_by_line_height() {
        let layout = LayoutConfig::new(12.0, 2.0);
        let mut canvas = Canvas::new(&layout);
        let mut col = Column::new(0.0, 10.0, 500.0);
        let style = TextStyle::new(FontFamily::Sans, 12.0, Rgb::new(0, 0, 0));
        let used = canvas.paragraph(&mut col, "one\ntwo", style);
        assert_eq!(used, 48.0);
        assert_eq!(col.y, 58.0);
    }

    #[test]
    fn test_empty_paragraph_emits_nothing() {
        let layout = LayoutConfig::default();
        let mut canvas = Canvas::new(&layout);
        let mut col = Column::new(0.0, 0.0, 500.0);
        let style = TextStyle::new(FontFamily::Sans, 14.0, Rgb::new(0, 0, 0));
        assert_eq!(canvas.paragraph(&mut col, "", style), 0.0);
        let page = canvas.finish(TemplateKind::Notion, col.y);
        assert!(page.nodes.is_empty());
    }
}
