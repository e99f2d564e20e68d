//! Software rasterizer for [`PageLayout`] display lists.
//!
//! Glyphs come from an 8×8 bitmap font stretched to each character's metric advance,
//! so text lands exactly where the layout measured it. Anything outside the page is
//! clipped by the buffer bounds.

use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS,
};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::editor::photo::decode_data_url;
use crate::export::{ExportError, Rasterizer};
use crate::layout::{FontWeight, ImageClip, Node, PageLayout, Rect, TextStyle};
use crate::models::design::Rgb;

/// Corner radius used for `ImageClip::Rounded`, in layout pixels.
const ROUNDED_CLIP_RADIUS: f32 = 12.0;

pub const MIN_SCALE: u32 = 2;
/// At 4× one A4 page is a 3176 × 4492 RGBA buffer, about 57 MB.
pub const MAX_SCALE: u32 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRasterizer;

impl Rasterizer for ImageRasterizer {
    fn rasterize(&self, page: &PageLayout, scale: u32) -> Result<RgbaImage, ExportError> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            return Err(ExportError::CaptureFailed(format!(
                "scale {scale} is outside {MIN_SCALE}..={MAX_SCALE}"
            )));
        }
        let s = scale as f32;
        let width = (page.width * s).round() as u32;
        let height = (page.height * s).round() as u32;
        if width == 0 || height == 0 {
            return Err(ExportError::CaptureFailed("page has no area".into()));
        }

        let mut canvas = RgbaImage::from_pixel(width, height, opaque(page.background));
        for node in &page.nodes {
            match node {
                Node::Rect {
                    frame,
                    fill,
                    radius,
                } => fill_rounded_rect(&mut canvas, scaled(frame, s), radius * s, *fill),
                Node::Text { frame, text, style } => {
                    draw_text(&mut canvas, scaled(frame, s), text, style, s)
                }
                Node::Image {
                    frame,
                    source,
                    clip,
                } => draw_image(&mut canvas, scaled(frame, s), source, *clip, s),
            }
        }
        Ok(canvas)
    }
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

fn scaled(frame: &Rect, s: f32) -> Rect {
    Rect::new(frame.x * s, frame.y * s, frame.width * s, frame.height * s)
}

/// Pixel index range covered by `[start, end)`, clipped to `0..limit`.
fn span(start: f32, end: f32, limit: u32) -> std::ops::Range<u32> {
    let lo = start.floor().max(0.0) as u32;
    let hi = (end.ceil().max(0.0) as u32).min(limit);
    lo.min(hi)..hi
}

fn inside_rounded(px: f32, py: f32, frame: &Rect, radius: f32) -> bool {
    if px < frame.x || px >= frame.right() || py < frame.y || py >= frame.bottom() {
        return false;
    }
    let r = radius.min(frame.width / 2.0).min(frame.height / 2.0).max(0.0);
    if r <= 0.0 {
        return true;
    }
    let cx = px.clamp(frame.x + r, frame.right() - r);
    let cy = py.clamp(frame.y + r, frame.bottom() - r);
    (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

fn fill_rounded_rect(canvas: &mut RgbaImage, frame: Rect, radius: f32, fill: Rgb) {
    let color = opaque(fill);
    for y in span(frame.y, frame.bottom(), canvas.height()) {
        for x in span(frame.x, frame.right(), canvas.width()) {
            if inside_rounded(x as f32 + 0.5, y as f32 + 0.5, &frame, radius) {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn draw_text(canvas: &mut RgbaImage, frame: Rect, text: &str, style: &TextStyle, s: f32) {
    let metrics = style.font.metrics();
    let glyph_height = style.size * s;
    let top = frame.y + (frame.height - glyph_height) / 2.0;
    let color = opaque(style.color);
    let mut x = frame.x;

    for c in text.chars() {
        let advance = metrics.advance(c) * style.size * s;
        if let Some(bitmap) = glyph(c) {
            let cell = Rect::new(x, top, advance, glyph_height);
            draw_glyph(canvas, &cell, &bitmap, color);
            if style.weight == FontWeight::Bold {
                let shifted = Rect::new(x + s.max(1.0) * 0.5, top, advance, glyph_height);
                draw_glyph(canvas, &shifted, &bitmap, color);
            }
        }
        x += advance;
    }
}

/// Basic Latin first, then Latin-1, Greek and the symbol sets. Anything else
/// keeps its advance but draws nothing.
fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| MISC_FONTS.get(c))
}

fn draw_glyph(canvas: &mut RgbaImage, glyph: &Rect, bitmap: &[u8; 8], color: Rgba<u8>) {
    if glyph.width <= 0.0 || glyph.height <= 0.0 {
        return;
    }
    for y in span(glyph.y, glyph.bottom(), canvas.height()) {
        let row = (((y as f32 + 0.5 - glyph.y) / glyph.height) * 8.0) as usize;
        let Some(bits) = bitmap.get(row) else {
            continue;
        };
        for x in span(glyph.x, glyph.right(), canvas.width()) {
            let col = (((x as f32 + 0.5 - glyph.x) / glyph.width) * 8.0) as u32;
            if col < 8 && bits & (1 << col) != 0 {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Draws the photo if it decodes; an unreadable source is skipped with a warning.
fn draw_image(canvas: &mut RgbaImage, frame: Rect, source: &str, clip: ImageClip, s: f32) {
    let decoded = decode_data_url(source)
        .ok_or_else(|| "not a base64 data URL".to_string())
        .and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
    let photo = match decoded {
        Ok(photo) => photo,
        Err(reason) => {
            warn!(%reason, "omitting image from export");
            return;
        }
    };

    let (w, h) = (frame.width.round() as u32, frame.height.round() as u32);
    if w == 0 || h == 0 {
        return;
    }
    let fitted = imageops::resize(&photo.to_rgba8(), w, h, FilterType::Triangle);
    let radius = match clip {
        ImageClip::Circle => frame.width.min(frame.height) / 2.0,
        ImageClip::Rounded => ROUNDED_CLIP_RADIUS * s,
    };
    let origin = (frame.x.round() as i64, frame.y.round() as i64);

    for (fx, fy, pixel) in fitted.enumerate_pixels() {
        let (x, y) = (origin.0 + fx as i64, origin.1 + fy as i64);
        if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
            continue;
        }
        if !inside_rounded(x as f32 + 0.5, y as f32 + 0.5, &frame, radius) {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        let blended = blend(*canvas.get_pixel(x, y), *pixel);
        canvas.put_pixel(x, y, blended);
    }
}

fn blend(under: Rgba<u8>, over: Rgba<u8>) -> Rgba<u8> {
    let alpha = over[3] as f32 / 255.0;
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - alpha) + b as f32 * alpha).round() as u8;
    Rgba([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::photo::{encode_photo, tiny_png};
    use crate::layout::page_fill::analyze_page_fill;
    use crate::layout::{FontFamily, PAGE_HEIGHT_PX, PAGE_WIDTH_PX};
    use crate::models::design::TemplateKind;

    fn page(nodes: Vec<Node>) -> PageLayout {
        PageLayout {
            template: TemplateKind::Notion,
            width: PAGE_WIDTH_PX,
            height: PAGE_HEIGHT_PX,
            background: Rgb::WHITE,
            nodes,
            sections: Vec::new(),
            fill: analyze_page_fill(0.0, PAGE_HEIGHT_PX),
        }
    }

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_output_is_scaled() {
        let raster = ImageRasterizer.rasterize(&page(Vec::new()), 2).unwrap();
        assert_eq!(raster.dimensions(), (1588, 2246));
        assert_eq!(*raster.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_scale_outside_bounds_is_rejected() {
        for scale in [1, MAX_SCALE + 1, 100] {
            let result = ImageRasterizer.rasterize(&page(Vec::new()), scale);
            assert!(matches!(result, Err(ExportError::CaptureFailed(_))), "scale {scale}");
        }
    }

    #[test]
    fn test_rect_fills_scaled_frame() {
        let nodes = vec![Node::Rect {
            frame: Rect::new(10.0, 10.0, 20.0, 20.0),
            fill: RED,
            radius: 0.0,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();
        assert_eq!(*raster.get_pixel(30, 30), opaque(RED));
        assert_eq!(*raster.get_pixel(19, 19), opaque(Rgb::WHITE));
        assert_eq!(*raster.get_pixel(60, 60), opaque(Rgb::WHITE));
    }

    #[test]
    fn test_rounded_corners_are_cut() {
        let frame = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(!inside_rounded(0.5, 0.5, &frame, 10.0));
        assert!(inside_rounded(10.0, 10.0, &frame, 10.0));
        assert!(inside_rounded(0.5, 0.5, &frame, 0.0));
    }

    #[test]
    fn test_text_inks_pixels_inside_its_frame() {
        let style = TextStyle::new(FontFamily::Sans, 14.0, RED);
        let frame = Rect::new(100.0, 100.0, style.measure("H"), 21.0);
        let nodes = vec![Node::Text {
            frame,
            text: "H".to_string(),
            style,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();
        let inked: Vec<(u32, u32)> = raster
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == opaque(RED))
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        let bounds = scaled(&frame, 2.0);
        assert!(inked.iter().all(|&(x, y)| {
            (x as f32) >= bounds.x - 1.0
                && (x as f32) <= bounds.right() + 2.0
                && (y as f32) >= bounds.y
                && (y as f32) <= bounds.bottom()
        }));
    }

    fn ink_in(raster: &RgbaImage, frame: &Rect) -> usize {
        let bounds = scaled(frame, 2.0);
        raster
            .enumerate_pixels()
            .filter(|&(x, y, p)| {
                *p == opaque(RED)
                    && (x as f32) >= bounds.x
                    && (x as f32) < bounds.right()
                    && (y as f32) >= bounds.y
                    && (y as f32) < bounds.bottom()
            })
            .count()
    }

    #[test]
    fn test_latin1_letters_are_drawn() {
        let style = TextStyle::new(FontFamily::Sans, 14.0, RED);
        let text = "José Núñez";
        let frame = Rect::new(100.0, 100.0, style.measure(text), 21.0);
        let nodes = vec![Node::Text {
            frame,
            text: text.to_string(),
            style,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();

        // Each accented letter's own advance box must carry ink.
        let mut x = frame.x;
        for c in text.chars() {
            let advance = style.measure(&c.to_string());
            if matches!(c, 'é' | 'ú' | 'ñ') {
                let cell = Rect::new(x, frame.y, advance, frame.height);
                assert!(ink_in(&raster, &cell) > 0, "no ink for {c:?}");
            }
            x += advance;
        }
    }

    #[test]
    fn test_greek_and_box_glyphs_resolve() {
        assert!(glyph('é').is_some());
        assert!(glyph('λ').is_some());
        assert!(glyph('│').is_some());
        assert_eq!(glyph('e'), BASIC_FONTS.get('e'));
    }

    #[test]
    fn test_photo_is_drawn_or_skipped() {
        let frame = Rect::new(0.0, 0.0, 40.0, 40.0);
        let good = encode_photo(&tiny_png()).unwrap();
        let nodes = vec![Node::Image {
            frame,
            source: good,
            clip: ImageClip::Circle,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();
        assert_eq!(*raster.get_pixel(40, 40), Rgba([200, 30, 30, 255]));
        assert_eq!(*raster.get_pixel(1, 1), opaque(Rgb::WHITE));

        let nodes = vec![Node::Image {
            frame,
            source: "data:image/png;base64,AAAA".to_string(),
            clip: ImageClip::Rounded,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();
        assert_eq!(*raster.get_pixel(40, 40), opaque(Rgb::WHITE));
    }

    #[test]
    fn test_content_below_page_is_clipped() {
        let nodes = vec![Node::Rect {
            frame: Rect::new(0.0, PAGE_HEIGHT_PX - 10.0, 50.0, 500.0),
            fill: RED,
            radius: 0.0,
        }];
        let raster = ImageRasterizer.rasterize(&page(nodes), 2).unwrap();
        assert_eq!(raster.height(), 2246);
        assert_eq!(*raster.get_pixel(10, 2245), opaque(RED));
    }
}
