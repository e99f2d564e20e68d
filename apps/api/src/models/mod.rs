pub mod design;
pub mod list;
pub mod resume;
