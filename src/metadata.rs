//! Per-session project metadata with lazy registry fallback.
//!
//! Page hits dominate most responses and usually share a handful of projects, so metadata is
//! resolved at most once per project per session. The [`SessionCache`] lives exactly as long
//! as one shaping session and is never shared between responses.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Docs location for the version a hit was indexed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub slug: String,
    pub docs_url: String,
}

/// Link and alias data for a project, as resolved within one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub version: VersionMetadata,
    /// Alias under which a superproject exposes this project, if any.
    #[serde(default)]
    pub alias: Option<String>,
}

impl ProjectMetadata {
    pub fn docs_base_url(&self) -> &str {
        &self.version.docs_url
    }
}

/// A project record as known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryProject {
    pub slug: String,
    /// Scheme and host serving the project's docs, e.g. `https://pip.readthedocs.io`.
    pub docs_domain: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Single-version projects serve docs from the domain root.
    #[serde(default)]
    pub single_version: bool,
    /// Aliases assigned by superprojects, in registry order.
    #[serde(default)]
    pub superproject_aliases: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl RegistryProject {
    /// Alias from the first superproject relationship.
    pub fn alias(&self) -> Option<&str> {
        self.superproject_aliases.first().map(String::as_str)
    }
}

/// Source of truth for projects and their docs URLs.
///
/// Implementations may be slow (a database, a remote service). Callers go through
/// [`resolve`] so each project is looked up at most once per session.
pub trait ProjectRegistry {
    fn find_project_by_slug(&self, slug: &str) -> Option<RegistryProject>;

    fn docs_url(&self, project: &RegistryProject, version_slug: &str) -> String;
}

/// In-memory registry backed by configured project records.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    projects: HashMap<String, RegistryProject>,
}

impl StaticRegistry {
    pub fn new(projects: impl IntoIterator<Item = RegistryProject>) -> Self {
        Self {
            projects: projects
                .into_iter()
                .map(|project| (project.slug.clone(), project))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectRegistry for StaticRegistry {
    fn find_project_by_slug(&self, slug: &str) -> Option<RegistryProject> {
        self.projects.get(slug).cloned()
    }

    fn docs_url(&self, project: &RegistryProject, version_slug: &str) -> String {
        let domain = project.docs_domain.trim_end_matches('/');
        if project.single_version {
            return format!("{domain}/");
        }
        if !project.versions.is_empty() && !project.versions.iter().any(|v| v == version_slug) {
            tracing::debug!(
                "Version '{}' is not registered for project '{}'",
                version_slug,
                project.slug
            );
        }
        format!("{domain}/{}/{version_slug}/", project.language)
    }
}

/// Project metadata resolved during one shaping session, keyed by project slug.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: AHashMap<String, ProjectMetadata>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from metadata the caller already has, skipping registry lookups for it.
    pub fn with_projects(projects: impl IntoIterator<Item = (String, ProjectMetadata)>) -> Self {
        Self {
            entries: projects.into_iter().collect(),
        }
    }

    pub fn get(&self, project_slug: &str) -> Option<&ProjectMetadata> {
        self.entries.get(project_slug)
    }

    pub fn contains(&self, project_slug: &str) -> bool {
        self.entries.contains_key(project_slug)
    }

    /// Record metadata for a project. The first entry for a slug is kept.
    pub fn insert(&mut self, project_slug: &str, metadata: ProjectMetadata) -> &ProjectMetadata {
        self.entries
            .entry(project_slug.to_string())
            .or_insert(metadata)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve metadata for `project_slug`, consulting the registry only on a cache miss.
///
/// A project the registry does not know is not cached, so a later call in the same session
/// asks again.
pub fn resolve<'c>(
    registry: &(impl ProjectRegistry + ?Sized),
    project_slug: &str,
    version_slug: &str,
    cache: &'c mut SessionCache,
) -> Option<&'c ProjectMetadata> {
    if cache.contains(project_slug) {
        tracing::debug!("Metadata cache hit for '{}'", project_slug);
        return cache.get(project_slug);
    }

    tracing::debug!(
        "Looking up project '{}' (version '{}') in registry",
        project_slug,
        version_slug
    );
    let Some(project) = registry.find_project_by_slug(project_slug) else {
        tracing::debug!("Project '{}' not found in registry", project_slug);
        return None;
    };

    let metadata = ProjectMetadata {
        version: VersionMetadata {
            slug: version_slug.to_string(),
            docs_url: registry.docs_url(&project, version_slug),
        },
        alias: project.alias().map(str::to_string),
    };
    Some(cache.insert(project_slug, metadata))
}
