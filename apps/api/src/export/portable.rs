//! Portable JSON snapshot: the document keys at the top level, plus the optional
//! `design` and `layout` configs. No version marker is written or expected.

use serde::{Deserialize, Serialize};

use crate::models::design::{DesignConfig, LayoutConfig};
use crate::models::resume::ResumeDocument;

pub const JSON_EXPORT_FILENAME: &str = "resume-data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableSnapshot {
    #[serde(flatten)]
    pub document: ResumeDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
}

impl PortableSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Missing document keys default; `design` and `layout` stay `None` when absent.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
