// Page geometry, text measurement and the display-list primitives the templates emit.
// Everything here is pure and deterministic: equal inputs give equal layouts.

pub mod font_metrics;
pub mod page;
pub mod page_fill;

pub use font_metrics::FontFamily;
pub use page::{FontWeight, ImageClip, Node, PageLayout, Rect, SectionKind, TextStyle};
pub use page::{PAGE_HEIGHT_MM, PAGE_HEIGHT_PX, PAGE_WIDTH_MM, PAGE_WIDTH_PX};
