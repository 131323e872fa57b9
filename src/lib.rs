//! Shapes raw documentation search hits into ranked, link-resolved, highlighted results.
//!
//! The pipeline, top-down: [`shape::ShapingSession`] classifies each [`hit::RawHit`],
//! merges a page's nested sections and domains by score, reads highlights through
//! [`highlight::read_field`] and resolves page links with [`link::LinkResolver`] using
//! project metadata memoized per session by [`metadata::resolve`].

pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod hit;
pub mod link;
pub mod metadata;
pub mod results;
pub mod shape;
pub mod tracing;

pub use config::ShaperConfig;
pub use error::ShapeError;
pub use hit::{FieldLookup, FieldValue, HighlightMap, HitKind, RawHit};
pub use link::{DocLink, LinkResolver};
pub use metadata::{
    ProjectMetadata, ProjectRegistry, RegistryProject, SessionCache, StaticRegistry,
    VersionMetadata,
};
pub use results::{PageBlock, SearchResult};
pub use shape::{Shaper, ShapingSession};
