//! Template Renderer — maps (document, design, layout) onto a fixed A4 page.
//!
//! `render` is a pure function dispatching on `DesignConfig.template`. Both variants
//! share one rule set: sections backed by an empty sequence (or a blank summary) are
//! omitted, every text size is a multiple of `LayoutConfig.font_size`, and every line
//! box is `size × line_spacing`.

mod canvas;
mod modern;
mod notion;

use crate::layout::PageLayout;
use crate::models::design::{DesignConfig, LayoutConfig, Rgb, TemplateKind};
use crate::models::resume::{PersonalInfo, ResumeDocument};

pub(crate) const SLATE_900: Rgb = Rgb::new(0x0f, 0x17, 0x2a);
pub(crate) const SLATE_800: Rgb = Rgb::new(0x1e, 0x29, 0x3b);
pub(crate) const SLATE_700: Rgb = Rgb::new(0x33, 0x41, 0x55);
pub(crate) const SLATE_600: Rgb = Rgb::new(0x47, 0x55, 0x69);
pub(crate) const SLATE_500: Rgb = Rgb::new(0x64, 0x74, 0x8b);
pub(crate) const SLATE_400: Rgb = Rgb::new(0x94, 0xa3, 0xb8);
pub(crate) const SLATE_200: Rgb = Rgb::new(0xe2, 0xe8, 0xf0);
pub(crate) const SLATE_100: Rgb = Rgb::new(0xf1, 0xf5, 0xf9);
pub(crate) const SLATE_50: Rgb = Rgb::new(0xf8, 0xfa, 0xfc);
pub(crate) const GREEN_500: Rgb = Rgb::new(0x22, 0xc5, 0x5e);

pub fn render(document: &ResumeDocument, design: &DesignConfig, layout: &LayoutConfig) -> PageLayout {
    match design.template {
        TemplateKind::Notion => notion::render(document, layout),
        TemplateKind::Modern => modern::render(document, design, layout),
    }
}

/// Non-blank contact entries as `(label, value)`, in display order.
pub(crate) fn contact_items(info: &PersonalInfo, doc: &ResumeDocument) -> Vec<(&'static str, String)> {
    [
        ("Email", &info.email),
        ("Phone", &info.phone),
        ("Location", &info.location),
        ("LinkedIn", &doc.socials.linkedin),
        ("GitHub", &doc.socials.github),
        ("Web", &doc.socials.website),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| (label, value.trim().to_string()))
    .collect()
}

pub(crate) fn photo_source(info: &PersonalInfo) -> Option<&str> {
    info.photo.as_deref().filter(|p| !p.trim().is_empty())
}
