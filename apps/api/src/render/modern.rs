//! Modern variant: accent-colored header band over two columns.
//! Left: skills and education. Right: summary, experience, projects.

use crate::layout::{FontFamily, ImageClip, PageLayout, Rect, SectionKind, TextStyle};
use crate::layout::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};
use crate::models::design::{DesignConfig, LayoutConfig, Rgb, TemplateKind};
use crate::models::resume::ResumeDocument;
use crate::render::canvas::{flow, Canvas, ChipStyle, Column};
use crate::render::{contact_items, photo_source};
use crate::render::{SLATE_100, SLATE_200, SLATE_400, SLATE_500, SLATE_50, SLATE_600};
use crate::render::{SLATE_700, SLATE_800};

const BAND_PADDING: f32 = 32.0;
const COLUMN_PADDING: f32 = 24.0;
const PHOTO_SIZE: f32 = 96.0;
const PHOTO_RING: f32 = 4.0;
const SECTION_GAP: f32 = 24.0;
const ITEM_GAP: f32 = 16.0;
const TIMELINE_INDENT: f32 = 16.0;

pub(crate) fn render(
    doc: &ResumeDocument,
    design: &DesignConfig,
    layout: &LayoutConfig,
) -> PageLayout {
    let mut canvas = Canvas::new(layout);
    let font = FontFamily::from_css_name(&design.font);
    let accent = design.accent_color;

    let band_bottom = header_band(&mut canvas, doc, font, accent);

    let left_width = PAGE_WIDTH_PX / 3.0;
    let left_frame = Rect::new(0.0, band_bottom, left_width, PAGE_HEIGHT_PX - band_bottom);
    canvas.rect(left_frame, SLATE_50);
    canvas.rect(
        Rect::new(left_width - 1.0, band_bottom, 1.0, left_frame.height),
        SLATE_100,
    );

    let mut left = Column::new(
        COLUMN_PADDING,
        band_bottom + COLUMN_PADDING,
        left_width - COLUMN_PADDING * 2.0,
    );
    left_column(&mut canvas, &mut left, doc, font, accent);

    let mut right = Column::new(
        left_width + COLUMN_PADDING,
        band_bottom + COLUMN_PADDING,
        PAGE_WIDTH_PX - left_width - COLUMN_PADDING * 2.0,
    );
    right_column(&mut canvas, &mut right, doc, font, accent);

    let content_bottom = left.y.max(right.y) - SECTION_GAP + COLUMN_PADDING;
    canvas.finish(TemplateKind::Modern, content_bottom.max(band_bottom))
}

/// Paints the full-width accent band and returns its bottom edge.
fn header_band(canvas: &mut Canvas, doc: &ResumeDocument, font: FontFamily, accent: Rgb) -> f32 {
    let info = &doc.personal_info;
    let on_accent = Rgb::WHITE;
    let muted = accent.tint(0.9);

    let name = TextStyle::new(font, canvas.em(2.6), on_accent).bold();
    let title = TextStyle::new(font, canvas.em(1.3), muted);
    let contact = TextStyle::new(font, canvas.em(0.75), muted);

    let has_photo = photo_source(info).is_some();
    let text_x = if has_photo {
        BAND_PADDING + PHOTO_SIZE + 24.0
    } else {
        BAND_PADDING
    };
    let text_width = PAGE_WIDTH_PX - text_x - BAND_PADDING;

    // Measure the text block first so the band can be drawn beneath it.
    let items: Vec<String> = contact_items(info, doc)
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    let contact_line = canvas.line_height(&contact);
    let widths: Vec<f32> = items.iter().map(|item| contact.measure(item)).collect();
    let positions = flow(&widths, text_width, 16.0, contact_line);
    let contact_height = positions
        .iter()
        .map(|(_, dy)| dy + contact_line)
        .fold(0.0_f32, f32::max);

    let wrapped_height = |style: &TextStyle, text: &str| {
        let lines = style
            .font
            .metrics()
            .wrap(text, text_width / style.size)
            .len();
        lines as f32 * canvas.line_height(style)
    };
    let name_height = wrapped_height(&name, &info.full_name);
    let title_height = wrapped_height(&title, &info.title);
    let contact_gap = if items.is_empty() { 0.0 } else { 16.0 };
    let text_height = name_height + 4.0 + title_height + contact_gap + contact_height;

    let inner_height = if has_photo {
        text_height.max(PHOTO_SIZE)
    } else {
        text_height
    };
    let band_height = inner_height + BAND_PADDING * 2.0;
    canvas.rect(Rect::new(0.0, 0.0, PAGE_WIDTH_PX, band_height), accent);

    if let Some(photo) = photo_source(info) {
        let photo_y = BAND_PADDING + (inner_height - PHOTO_SIZE) / 2.0;
        let ring = Rect::new(
            BAND_PADDING - PHOTO_RING,
            photo_y - PHOTO_RING,
            PHOTO_SIZE + PHOTO_RING * 2.0,
            PHOTO_SIZE + PHOTO_RING * 2.0,
        );
        canvas.rounded_rect(ring, accent.tint(0.3), ring.width / 2.0);
        let frame = Rect::new(BAND_PADDING, photo_y, PHOTO_SIZE, PHOTO_SIZE);
        canvas.image(frame, photo, ImageClip::Circle);
    }

    let mut col = Column::new(
        text_x,
        BAND_PADDING + (inner_height - text_height) / 2.0,
        text_width,
    );
    canvas.paragraph(&mut col, &info.full_name, name);
    col.gap(4.0);
    canvas.paragraph(&mut col, &info.title, title);
    col.gap(contact_gap);
    for (item, (dx, dy)) in items.iter().zip(&positions) {
        canvas.text_line(col.x + dx, col.y + dy, item, contact);
    }

    band_height
}

fn left_column(
    canvas: &mut Canvas,
    col: &mut Column,
    doc: &ResumeDocument,
    font: FontFamily,
    accent: Rgb,
) {
    if !doc.skills.is_empty() {
        heading(canvas, col, SectionKind::Skills, "Skills", font, accent);
        let labels: Vec<&str> = doc.skills.iter().map(|s| s.name.as_str()).collect();
        let chip = ChipStyle {
            text: TextStyle::new(font, canvas.em(0.7), SLATE_700).bold(),
            fill: Rgb::WHITE,
            border: Some(SLATE_200),
            radius: 4.0,
            pad_x: 8.0,
            pad_y: 4.0,
            gap: 8.0,
        };
        canvas.chips(col, &labels, chip);
        col.gap(SECTION_GAP);
    }

    if !doc.education.is_empty() {
        heading(canvas, col, SectionKind::Education, "Education", font, accent);
        let degree = TextStyle::new(font, canvas.em(0.85), SLATE_800).bold();
        let school = TextStyle::new(font, canvas.em(0.75), SLATE_500);
        let duration = TextStyle::new(font, canvas.em(0.7), SLATE_400);
        for (i, edu) in doc.education.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            canvas.paragraph(col, &edu.degree, degree);
            canvas.paragraph(col, &edu.school, school);
            canvas.paragraph(col, &edu.duration, duration);
        }
        col.gap(SECTION_GAP);
    }
}

fn right_column(
    canvas: &mut Canvas,
    col: &mut Column,
    doc: &ResumeDocument,
    font: FontFamily,
    accent: Rgb,
) {
    if !doc.summary.trim().is_empty() {
        heading(canvas, col, SectionKind::Summary, "Professional Summary", font, accent);
        let body = TextStyle::new(font, canvas.em(0.85), SLATE_600);
        canvas.paragraph(col, &doc.summary, body);
        col.gap(SECTION_GAP);
    }

    if !doc.experience.is_empty() {
        heading(canvas, col, SectionKind::Experience, "Experience", font, accent);
        for (i, exp) in doc.experience.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            timeline_entry(
                canvas,
                col,
                font,
                accent,
                TimelineText {
                    title: &exp.role,
                    badge: &exp.duration,
                    subtitle: &exp.company,
                    body: &exp.description,
                },
            );
        }
        col.gap(SECTION_GAP);
    }

    if !doc.projects.is_empty() {
        heading(canvas, col, SectionKind::Projects, "Projects", font, accent);
        for (i, project) in doc.projects.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            timeline_entry(
                canvas,
                col,
                font,
                accent,
                TimelineText {
                    title: &project.title,
                    badge: "",
                    subtitle: "",
                    body: &project.description,
                },
            );
        }
        col.gap(SECTION_GAP);
    }
}

fn heading(
    canvas: &mut Canvas,
    col: &mut Column,
    kind: SectionKind,
    label: &str,
    font: FontFamily,
    accent: Rgb,
) {
    canvas.mark_section(kind);
    let style = TextStyle::new(font, canvas.em(0.75), accent).bold();
    canvas.paragraph(col, &label.to_uppercase(), style);
    col.gap(4.0);
    canvas.rect(Rect::new(col.x, col.y, col.width, 1.0), SLATE_100);
    col.gap(12.0);
}

struct TimelineText<'a> {
    title: &'a str,
    badge: &'a str,
    subtitle: &'a str,
    body: &'a str,
}

/// An entry hung off a thin vertical rule with an accent dot at its top.
fn timeline_entry(
    canvas: &mut Canvas,
    col: &mut Column,
    font: FontFamily,
    accent: Rgb,
    text: TimelineText<'_>,
) {
    let top = col.y;
    let title = TextStyle::new(font, canvas.em(0.85), SLATE_800).bold();
    let badge = TextStyle::new(FontFamily::Mono, canvas.em(0.7), SLATE_400);
    let subtitle = TextStyle::new(font, canvas.em(0.75), SLATE_500).bold();
    let body = TextStyle::new(font, canvas.em(0.75), SLATE_600);

    let mut inner = col.indented(TIMELINE_INDENT);
    let badge_width = if text.badge.trim().is_empty() {
        0.0
    } else {
        badge.measure(text.badge)
    };
    let mut title_col = Column::new(
        inner.x,
        inner.y,
        (inner.width - badge_width - 8.0).max(0.0),
    );
    canvas.paragraph(&mut title_col, text.title, title);
    if badge_width > 0.0 {
        canvas.text_line(inner.x + inner.width - badge_width, top, text.badge, badge);
    }
    inner.y = title_col.y.max(top + canvas.line_height(&badge));
    if !text.subtitle.trim().is_empty() {
        inner.gap(2.0);
        canvas.paragraph(&mut inner, text.subtitle, subtitle);
    }
    if !text.body.trim().is_empty() {
        inner.gap(4.0);
        canvas.paragraph(&mut inner, text.body, body);
    }

    let height = (inner.y - top).max(0.0);
    canvas.rect(Rect::new(col.x, top, 2.0, height), SLATE_200);
    let dot = 8.0;
    let dot_y = top + (canvas.line_height(&title) - dot) / 2.0;
    canvas.rounded_rect(Rect::new(col.x - 3.0, dot_y, dot, dot), accent, dot / 2.0);
    col.y = inner.y;
}
