//! Raw hits as returned by the search index, before any shaping.
//!
//! A [`RawHit`] is a loosely-typed bag of source fields plus the index's highlight map and
//! nested inner-hit groups. Nothing here interprets the fields; classification into a
//! [`HitKind`] happens once at the boundary and shaping works from the enum afterwards.

use crate::error::ShapeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Inner-hit group holding in-page prose sections.
pub const SECTIONS_GROUP: &str = "sections";

/// Inner-hit group holding API domain objects.
pub const DOMAINS_GROUP: &str = "domains";

/// A single source field value. The index returns either a scalar string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Coerce the value to a list, wrapping scalars.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::List(items) => items.clone(),
        }
    }

    /// The scalar view of this value. Lists yield their first element.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(items) => items.first().map(String::as_str),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Named field access over some loosely-typed record.
///
/// Both the source fields of a hit and its highlight map implement this, so highlight
/// extraction never needs to know which one it is reading from.
pub trait FieldLookup {
    fn get_field(&self, name: &str) -> Option<FieldValue>;
}

/// Highlight fragments keyed by (possibly dotted) field name, e.g. `title` or `sections.title.raw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightMap(BTreeMap<String, Vec<String>>);

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fragments for a field, replacing any previous ones.
    pub fn insert(&mut self, field: impl Into<String>, fragments: Vec<String>) {
        self.0.insert(field.into(), fragments);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldLookup for HighlightMap {
    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.0.get(name).cloned().map(FieldValue::List)
    }
}

/// An unshaped hit from the index.
///
/// `kind` is only set on top-level hits; inner hits take their kind from the group they
/// were returned in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Relevance score. Field-sorted queries return `null`, read as `0.0`.
    #[serde(default, deserialize_with = "score_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub highlight: HighlightMap,
    #[serde(default)]
    pub inner_hits: BTreeMap<String, Vec<RawHit>>,
}

fn score_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawHit {
    /// Scalar value of a source field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Inner hits for a relation, empty when the index returned none.
    pub fn inner(&self, group: &str) -> &[RawHit] {
        self.inner_hits
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Classify a top-level hit by its declared kind.
    pub fn declared_kind(&self) -> Result<HitKind, ShapeError> {
        self.kind
            .as_deref()
            .ok_or(ShapeError::MissingKind)?
            .parse()
    }
}

impl FieldLookup for RawHit {
    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }
}

/// The four kinds of result the index produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Project,
    Page,
    Domain,
    Section,
}

impl HitKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Page => "page",
            Self::Domain => "domain",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HitKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "page" => Ok(Self::Page),
            "domain" => Ok(Self::Domain),
            "section" => Ok(Self::Section),
            other => Err(ShapeError::UnknownHitKind(other.to_string())),
        }
    }
}
