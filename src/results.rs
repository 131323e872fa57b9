//! Shaped search results, ready for presentation.
//!
//! Every variant serializes with a `type` discriminant. Optional link fields serialize as
//! `null` rather than being omitted so that consumers see a stable set of keys.

use crate::highlight::{DomainHighlights, PageHighlights, ProjectHighlights, SectionHighlights};
use crate::hit::HitKind;
use serde::{Deserialize, Serialize};

/// A shaped top-level result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Project(ProjectResult),
    Page(PageResult),
    Domain(DomainResult),
    Section(SectionResult),
}

impl SearchResult {
    pub const fn kind(&self) -> HitKind {
        match self {
            Self::Project(_) => HitKind::Project,
            Self::Page(_) => HitKind::Page,
            Self::Domain(_) => HitKind::Domain,
            Self::Section(_) => HitKind::Section,
        }
    }

    pub const fn as_page(&self) -> Option<&PageResult> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }
}

/// A nested match inside a page, ordered by relevance within [`PageResult::blocks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageBlock {
    Domain(DomainResult),
    Section(SectionResult),
}

impl PageBlock {
    /// Anchor id of the block within its page.
    pub fn id(&self) -> &str {
        match self {
            Self::Domain(domain) => &domain.id,
            Self::Section(section) => &section.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResult {
    pub name: String,
    pub slug: String,
    pub link: String,
    pub description: String,
    pub highlights: ProjectHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub project: String,
    pub project_alias: Option<String>,
    pub version: String,
    pub title: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub highlights: PageHighlights,
    pub blocks: Vec<PageBlock>,
}

/// An API object (function, class, option) documented on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainResult {
    pub role: String,
    pub name: String,
    pub id: String,
    pub content: String,
    pub highlights: DomainHighlights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub highlights: SectionHighlights,
}
