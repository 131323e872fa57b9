//! Highlight extraction with raw-field preference.
//!
//! The index highlights both an analyzed field (`title`) and, where mapped, an unanalyzed
//! sibling (`title.raw`). The raw variant matches the exact text the user typed, so it wins
//! whenever the index returned it.

use crate::hit::FieldLookup;
use serde::{Deserialize, Serialize};

/// Suffix the index uses for unanalyzed sibling fields.
const RAW_SUFFIX: &str = ".raw";

/// Read highlight fragments for `field`, preferring `{field}.raw`.
///
/// A raw entry wins even when it is empty. Missing fields yield an empty list, never an error.
pub fn read_field(source: &impl FieldLookup, field: &str) -> Vec<String> {
    source
        .get_field(&format!("{field}{RAW_SUFFIX}"))
        .or_else(|| source.get_field(field))
        .map(|value| value.to_list())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHighlights {
    pub name: Vec<String>,
    pub slug: Vec<String>,
    pub description: Vec<String>,
}

impl ProjectHighlights {
    pub fn read(source: &impl FieldLookup) -> Self {
        Self {
            name: read_field(source, "name"),
            slug: read_field(source, "slug"),
            description: read_field(source, "description"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHighlights {
    pub title: Vec<String>,
}

impl PageHighlights {
    pub fn read(source: &impl FieldLookup) -> Self {
        Self {
            title: read_field(source, "title"),
        }
    }
}

/// Domain highlights. The index namespaces nested fields by relation (`domains.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainHighlights {
    pub name: Vec<String>,
    pub content: Vec<String>,
}

impl DomainHighlights {
    pub fn read(source: &impl FieldLookup) -> Self {
        Self {
            name: read_field(source, "domains.name"),
            content: read_field(source, "domains.docstrings"),
        }
    }
}

/// Section highlights, read from the `sections.*` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHighlights {
    pub title: Vec<String>,
    pub content: Vec<String>,
}

impl SectionHighlights {
    pub fn read(source: &impl FieldLookup) -> Self {
        Self {
            title: read_field(source, "sections.title"),
            content: read_field(source, "sections.content"),
        }
    }
}
