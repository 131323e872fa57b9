//! Result shaping: classify raw hits, merge nested matches, attach links.
//!
//! A [`Shaper`] is long-lived and holds the registry and link rules. Each search response is
//! shaped inside its own [`ShapingSession`], which owns the metadata cache for that response
//! and drops it when the response is done. Concurrent responses each take their own session.

use crate::error::ShapeError;
use crate::highlight::{DomainHighlights, PageHighlights, ProjectHighlights, SectionHighlights};
use crate::hit::{DOMAINS_GROUP, HitKind, RawHit, SECTIONS_GROUP};
use crate::link::{DocLink, LinkResolver};
use crate::metadata::{self, ProjectMetadata, ProjectRegistry, SessionCache};
use crate::results::{
    DomainResult, PageBlock, PageResult, ProjectResult, SearchResult, SectionResult,
};
use std::cmp::Ordering;

/// Registry and link rules shared by every shaping session.
#[derive(Debug, Clone)]
pub struct Shaper<R> {
    registry: R,
    links: LinkResolver,
}

impl<R: ProjectRegistry> Shaper<R> {
    /// Create a shaper with the default directory-style doctypes.
    pub fn new(registry: R) -> Self {
        Self::with_link_resolver(registry, LinkResolver::default())
    }

    pub fn with_link_resolver(registry: R, links: LinkResolver) -> Self {
        Self { registry, links }
    }

    pub const fn registry(&self) -> &R {
        &self.registry
    }

    pub const fn link_resolver(&self) -> &LinkResolver {
        &self.links
    }

    /// Start a session with an empty metadata cache.
    pub fn session(&self) -> ShapingSession<'_, R> {
        self.session_with(SessionCache::new())
    }

    /// Start a session seeded with metadata the caller already resolved.
    pub fn session_with(&self, cache: SessionCache) -> ShapingSession<'_, R> {
        ShapingSession {
            registry: &self.registry,
            links: &self.links,
            cache,
        }
    }
}

/// Shaping state for one search response.
#[derive(Debug)]
pub struct ShapingSession<'s, R> {
    registry: &'s R,
    links: &'s LinkResolver,
    cache: SessionCache,
}

impl<R: ProjectRegistry> ShapingSession<'_, R> {
    /// Shape one top-level hit according to its declared kind.
    pub fn shape(&mut self, hit: &RawHit) -> Result<SearchResult, ShapeError> {
        match hit.declared_kind()? {
            HitKind::Project => shape_project(hit).map(SearchResult::Project),
            HitKind::Page => self.shape_page(hit).map(SearchResult::Page),
            HitKind::Domain => shape_domain(hit).map(SearchResult::Domain),
            HitKind::Section => shape_section(hit).map(SearchResult::Section),
        }
    }

    /// Shape every hit of a response, in order.
    ///
    /// Failures stay with the hit that caused them; the remaining hits are still shaped.
    pub fn shape_all(&mut self, hits: &[RawHit]) -> Vec<Result<SearchResult, ShapeError>> {
        hits.iter()
            .enumerate()
            .map(|(position, hit)| {
                self.shape(hit).inspect_err(|e| {
                    tracing::warn!("Skipping hit {}: {}", position, e);
                })
            })
            .collect()
    }

    /// Metadata for a project, from this session's cache or the registry.
    pub fn resolve_metadata(
        &mut self,
        project_slug: &str,
        version_slug: &str,
    ) -> Option<&ProjectMetadata> {
        metadata::resolve(self.registry, project_slug, version_slug, &mut self.cache)
    }

    /// Canonical link for a page hit, or `None` when it cannot be resolved.
    pub fn resolve_link(&mut self, hit: &RawHit) -> Option<DocLink> {
        let project = hit.text("project")?;
        let version = hit.text("version")?;
        let metadata = metadata::resolve(self.registry, project, version, &mut self.cache);
        page_link(self.links, metadata, hit)
    }

    pub const fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// End the session, handing back what it resolved.
    pub fn into_cache(self) -> SessionCache {
        self.cache
    }

    fn shape_page(&mut self, hit: &RawHit) -> Result<PageResult, ShapeError> {
        let project = required(hit, HitKind::Page, "project")?;
        let version = required(hit, HitKind::Page, "version")?;
        let title = required(hit, HitKind::Page, "title")?;

        let metadata = metadata::resolve(self.registry, project, version, &mut self.cache);
        let project_alias = metadata.and_then(|metadata| metadata.alias.clone());
        let (path, domain) = match page_link(self.links, metadata, hit) {
            Some(link) => (Some(link.path), Some(link.domain)),
            None => {
                tracing::debug!("No link for page '{}' in project '{}'", title, project);
                (None, None)
            }
        };

        Ok(PageResult {
            project: project.to_string(),
            project_alias,
            version: version.to_string(),
            title: title.to_string(),
            path,
            domain,
            highlights: PageHighlights::read(&hit.highlight),
            blocks: merge_blocks(hit),
        })
    }
}

fn page_link(
    links: &LinkResolver,
    metadata: Option<&ProjectMetadata>,
    hit: &RawHit,
) -> Option<DocLink> {
    let Some(full_path) = hit.text("full_path") else {
        tracing::debug!("Page hit has no path, skipping link");
        return None;
    };
    links.resolve(metadata, full_path, hit.text("doctype"))
}

/// Nested hit groups of a page, tagged before merging since both share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Section,
    Domain,
}

/// Merge a page's sections and domains into one list ordered by score, highest first.
///
/// Equal scores keep their pre-sort order: sections before domains, each in index order.
/// A block that cannot be shaped is dropped without affecting the page.
fn merge_blocks(hit: &RawHit) -> Vec<PageBlock> {
    let sections = hit
        .inner(SECTIONS_GROUP)
        .iter()
        .map(|inner| (BlockKind::Section, inner));
    let domains = hit
        .inner(DOMAINS_GROUP)
        .iter()
        .map(|inner| (BlockKind::Domain, inner));

    let mut tagged: Vec<_> = sections.chain(domains).collect();
    tagged.sort_by(|(_, a), (_, b)| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    tagged
        .into_iter()
        .filter_map(|(kind, inner)| {
            let block = match kind {
                BlockKind::Section => shape_section(inner).map(PageBlock::Section),
                BlockKind::Domain => shape_domain(inner).map(PageBlock::Domain),
            };
            block
                .inspect_err(|e| tracing::warn!("Dropping page block: {}", e))
                .ok()
        })
        .collect()
}

fn shape_project(hit: &RawHit) -> Result<ProjectResult, ShapeError> {
    const KIND: HitKind = HitKind::Project;
    Ok(ProjectResult {
        name: required(hit, KIND, "name")?.to_string(),
        slug: required(hit, KIND, "slug")?.to_string(),
        link: required(hit, KIND, "url")?.to_string(),
        description: required(hit, KIND, "description")?.to_string(),
        highlights: ProjectHighlights::read(&hit.highlight),
    })
}

fn shape_domain(hit: &RawHit) -> Result<DomainResult, ShapeError> {
    const KIND: HitKind = HitKind::Domain;
    Ok(DomainResult {
        role: required(hit, KIND, "role_name")?.to_string(),
        name: required(hit, KIND, "name")?.to_string(),
        id: required(hit, KIND, "anchor")?.to_string(),
        content: required(hit, KIND, "docstrings")?.to_string(),
        highlights: DomainHighlights::read(&hit.highlight),
    })
}

fn shape_section(hit: &RawHit) -> Result<SectionResult, ShapeError> {
    const KIND: HitKind = HitKind::Section;
    Ok(SectionResult {
        id: required(hit, KIND, "id")?.to_string(),
        title: required(hit, KIND, "title")?.to_string(),
        content: required(hit, KIND, "content")?.to_string(),
        highlights: SectionHighlights::read(&hit.highlight),
    })
}

fn required<'h>(
    hit: &'h RawHit,
    kind: HitKind,
    field: &'static str,
) -> Result<&'h str, ShapeError> {
    hit.text(field)
        .ok_or(ShapeError::MissingAttribute { kind, field })
}
