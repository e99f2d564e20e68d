//! Notion variant: one column, left-bar section markers, monospaced contact block.

use crate::layout::{FontFamily, ImageClip, PageLayout, Rect, SectionKind, TextStyle, PAGE_WIDTH_PX};
use crate::models::design::{LayoutConfig, TemplateKind};
use crate::models::resume::{Education, Experience, Project, ResumeDocument};
use crate::render::canvas::{flow, Canvas, ChipStyle, Column};
use crate::render::{contact_items, photo_source};
use crate::render::{GREEN_500, SLATE_100, SLATE_200, SLATE_400, SLATE_500, SLATE_50, SLATE_600};
use crate::render::{SLATE_700, SLATE_900};

const PADDING: f32 = 48.0;
const PHOTO_SIZE: f32 = 96.0;
const SECTION_GAP: f32 = 32.0;
const ITEM_GAP: f32 = 24.0;
const MARKER_WIDTH: f32 = 4.0;

pub(crate) fn render(doc: &ResumeDocument, layout: &LayoutConfig) -> PageLayout {
    let mut canvas = Canvas::new(layout);
    let mut col = Column::new(PADDING, PADDING, PAGE_WIDTH_PX - PADDING * 2.0);

    header(&mut canvas, &mut col, doc);
    contact_block(&mut canvas, &mut col, doc);

    if !doc.summary.trim().is_empty() {
        heading(&mut canvas, &mut col, SectionKind::Summary, "About");
        let body = TextStyle::new(FontFamily::Sans, canvas.em(1.0), SLATE_700);
        canvas.paragraph(&mut col, &doc.summary, body);
        col.gap(SECTION_GAP);
    }

    if !doc.experience.is_empty() {
        heading(&mut canvas, &mut col, SectionKind::Experience, "Experience");
        for (i, exp) in doc.experience.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            experience_item(&mut canvas, &mut col, exp);
        }
        col.gap(SECTION_GAP);
    }

    if !doc.projects.is_empty() {
        heading(&mut canvas, &mut col, SectionKind::Projects, "Projects");
        for (i, project) in doc.projects.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            project_item(&mut canvas, &mut col, project);
        }
        col.gap(SECTION_GAP);
    }

    if !doc.education.is_empty() {
        heading(&mut canvas, &mut col, SectionKind::Education, "Education");
        for (i, edu) in doc.education.iter().enumerate() {
            if i > 0 {
                col.gap(ITEM_GAP);
            }
            education_item(&mut canvas, &mut col, edu);
        }
        col.gap(SECTION_GAP);
    }

    if !doc.skills.is_empty() {
        heading(&mut canvas, &mut col, SectionKind::Skills, "Skills");
        let labels: Vec<&str> = doc.skills.iter().map(|s| s.name.as_str()).collect();
        let chip = ChipStyle {
            text: TextStyle::new(FontFamily::Sans, canvas.em(0.85), SLATE_900),
            fill: SLATE_100,
            border: Some(SLATE_200),
            radius: 12.0,
            pad_x: 12.0,
            pad_y: 4.0,
            gap: 8.0,
        };
        canvas.chips(&mut col, &labels, chip);
        col.gap(SECTION_GAP);
    }

    // The trailing section gap is replaced by the bottom padding.
    canvas.finish(TemplateKind::Notion, col.y - SECTION_GAP + PADDING)
}

fn header(canvas: &mut Canvas, col: &mut Column, doc: &ResumeDocument) {
    let info = &doc.personal_info;
    if let Some(photo) = photo_source(info) {
        let frame = Rect::new(col.x, col.y, PHOTO_SIZE, PHOTO_SIZE);
        canvas.image(frame, photo, ImageClip::Rounded);
        col.gap(PHOTO_SIZE + 24.0);
    }

    let name = TextStyle::new(FontFamily::Sans, canvas.em(3.0), SLATE_900).bold();
    canvas.paragraph(col, &info.full_name, name);

    if !info.title.trim().is_empty() {
        col.gap(canvas.em(0.5));
        let title = TextStyle::new(FontFamily::Sans, canvas.em(1.4), SLATE_500);
        let dot = canvas.em(0.6);
        let line_height = canvas.line_height(&title);
        let dot_frame = Rect::new(col.x, col.y + (line_height - dot) / 2.0, dot, dot);
        canvas.rounded_rect(dot_frame, GREEN_500, dot / 2.0);
        let mut text_col = col.indented(dot + 8.0);
        canvas.paragraph(&mut text_col, &info.title, title);
        col.y = text_col.y;
    }
    col.gap(SECTION_GAP);
}

fn contact_block(canvas: &mut Canvas, col: &mut Column, doc: &ResumeDocument) {
    let items: Vec<String> = contact_items(&doc.personal_info, doc)
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    if items.is_empty() {
        return;
    }

    let pad = 16.0;
    let style = TextStyle::new(FontFamily::Mono, canvas.em(0.85), SLATE_600);
    let line_height = canvas.line_height(&style);
    let widths: Vec<f32> = items.iter().map(|item| style.measure(item)).collect();
    let positions = flow(&widths, col.width - pad * 2.0, pad, line_height);
    let rows_height = positions
        .iter()
        .map(|(_, dy)| dy + line_height)
        .fold(0.0_f32, f32::max);

    let frame = Rect::new(col.x, col.y, col.width, rows_height + pad * 2.0);
    canvas.bordered_rect(frame, SLATE_50, SLATE_200, 6.0);
    for (item, (dx, dy)) in items.iter().zip(&positions) {
        canvas.text_line(frame.x + pad + dx, frame.y + pad + dy, item, style);
    }
    col.gap(frame.height + SECTION_GAP);
}

/// Uppercase heading with a solid bar on its left edge and a rule underneath.
fn heading(canvas: &mut Canvas, col: &mut Column, kind: SectionKind, label: &str) {
    canvas.mark_section(kind);
    let style = TextStyle::new(FontFamily::Sans, canvas.em(1.15), SLATE_900).bold();
    let line_height = canvas.line_height(&style);
    canvas.rect(Rect::new(col.x, col.y, MARKER_WIDTH, line_height), SLATE_900);
    canvas.text_line(col.x + MARKER_WIDTH + 12.0, col.y, &label.to_uppercase(), style);
    col.gap(line_height + 8.0);
    canvas.rect(Rect::new(col.x, col.y, col.width, 1.0), SLATE_200);
    col.gap(16.0);
}

/// Title lines on the left, an optional monospaced badge on the right.
fn titled_entry(
    canvas: &mut Canvas,
    col: &mut Column,
    title: &str,
    subtitle: &str,
    badge: &str,
) {
    let badge_style = TextStyle::new(FontFamily::Mono, canvas.em(0.75), SLATE_500);
    let badge_pad = 8.0;
    let badge_width = if badge.trim().is_empty() {
        0.0
    } else {
        badge_style.measure(badge) + badge_pad * 2.0
    };

    let top = col.y;
    let title_width = if badge_width > 0.0 {
        (col.width - badge_width - 12.0).max(0.0)
    } else {
        col.width
    };
    let mut title_col = Column::new(col.x, col.y, title_width);
    let title_style = TextStyle::new(FontFamily::Sans, canvas.em(1.25), SLATE_900).bold();
    canvas.paragraph(&mut title_col, title, title_style);
    if !subtitle.trim().is_empty() {
        let subtitle_style = TextStyle::new(FontFamily::Sans, canvas.em(1.0), SLATE_400);
        canvas.paragraph(&mut title_col, subtitle, subtitle_style);
    }

    let mut bottom = title_col.y;
    if badge_width > 0.0 {
        let height = canvas.line_height(&badge_style) + badge_pad / 2.0;
        let frame = Rect::new(col.x + col.width - badge_width, top, badge_width, height);
        canvas.rounded_rect(frame, SLATE_100, 4.0);
        canvas.text_line(frame.x + badge_pad, frame.y + badge_pad / 4.0, badge, badge_style);
        bottom = bottom.max(frame.bottom());
    }
    col.y = bottom;
}

fn description(canvas: &mut Canvas, col: &mut Column, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    col.gap(8.0);
    let style = TextStyle::new(FontFamily::Sans, canvas.em(1.0), SLATE_600);
    canvas.paragraph(col, text, style);
}

fn experience_item(canvas: &mut Canvas, col: &mut Column, exp: &Experience) {
    let company = if exp.company.trim().is_empty() {
        String::new()
    } else {
        format!("@ {}", exp.company.trim())
    };
    titled_entry(canvas, col, &exp.role, &company, &exp.duration);
    description(canvas, col, &exp.description);
}

fn project_item(canvas: &mut Canvas, col: &mut Column, project: &Project) {
    titled_entry(canvas, col, &project.title, "", "");
    description(canvas, col, &project.description);
}

fn education_item(canvas: &mut Canvas, col: &mut Column, edu: &Education) {
    titled_entry(canvas, col, &edu.degree, &edu.school, &edu.duration);
}
