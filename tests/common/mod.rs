//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `registry`: a [`CountingRegistry`] knowing `pip` (with a superproject alias) and `mkdocs`
//! - `shaper`: a [`Shaper`] over that registry with the default directory-style doctypes
//!
//! Hit builders (`page_hit`, `section_hit`, `domain_hit`, `project_hit`) produce raw hits
//! shaped the way the index returns them.
//!
//! # Shared Infrastructure
//!
//! [`TempWorkspace`] provides a temp directory for tests that read config files from disk.

use docsearch_results::{FieldValue, HighlightMap, RawHit, RegistryProject, Shaper};
use docsearch_results::{ProjectRegistry, StaticRegistry};
use rstest::fixture;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A registry stub that counts lookups, for asserting memoization.
#[allow(dead_code)]
pub struct CountingRegistry {
    inner: StaticRegistry,
    lookups: Cell<usize>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl CountingRegistry {
    pub fn new(projects: impl IntoIterator<Item = RegistryProject>) -> Self {
        Self {
            inner: StaticRegistry::new(projects),
            lookups: Cell::new(0),
        }
    }

    /// Number of `find_project_by_slug` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl ProjectRegistry for CountingRegistry {
    fn find_project_by_slug(&self, slug: &str) -> Option<RegistryProject> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.find_project_by_slug(slug)
    }

    fn docs_url(&self, project: &RegistryProject, version_slug: &str) -> String {
        self.inner.docs_url(project, version_slug)
    }
}

#[allow(dead_code)]
pub fn project(slug: &str, aliases: &[&str]) -> RegistryProject {
    RegistryProject {
        slug: slug.to_string(),
        docs_domain: format!("https://{slug}.readthedocs.io"),
        language: "en".to_string(),
        single_version: false,
        superproject_aliases: aliases.iter().map(|s| s.to_string()).collect(),
        versions: vec!["latest".to_string(), "stable".to_string()],
    }
}

#[allow(dead_code)]
#[fixture]
pub fn registry() -> CountingRegistry {
    CountingRegistry::new([project("pip", &["pypa-pip"]), project("mkdocs", &[])])
}

#[allow(dead_code)]
#[fixture]
pub fn shaper(registry: CountingRegistry) -> Shaper<CountingRegistry> {
    Shaper::new(registry)
}

/// Build a raw hit from scalar fields.
#[allow(dead_code)]
pub fn raw_hit(kind: Option<&str>, score: f64, fields: &[(&str, &str)]) -> RawHit {
    RawHit {
        kind: kind.map(str::to_string),
        score,
        fields: fields
            .iter()
            .map(|(name, value)| ((*name).to_string(), FieldValue::from(*value)))
            .collect(),
        ..RawHit::default()
    }
}

#[allow(dead_code)]
pub fn with_highlights(mut hit: RawHit, entries: &[(&str, Vec<&str>)]) -> RawHit {
    let mut map = HighlightMap::new();
    for (field, fragments) in entries {
        map.insert(*field, fragments.iter().map(|s| s.to_string()).collect());
    }
    hit.highlight = map;
    hit
}

#[allow(dead_code)]
pub fn page_hit(project: &str, full_path: &str, doctype: &str) -> RawHit {
    raw_hit(
        Some("page"),
        1.0,
        &[
            ("project", project),
            ("version", "latest"),
            ("title", "Getting Started"),
            ("full_path", full_path),
            ("doctype", doctype),
        ],
    )
}

#[allow(dead_code)]
pub fn section_hit(id: &str, score: f64) -> RawHit {
    raw_hit(
        None,
        score,
        &[("id", id), ("title", "Section"), ("content", "Some prose")],
    )
}

#[allow(dead_code)]
pub fn domain_hit(id: &str, score: f64) -> RawHit {
    raw_hit(
        None,
        score,
        &[
            ("role_name", "py:function"),
            ("name", "pip.main"),
            ("anchor", id),
            ("docstrings", "Entry point"),
        ],
    )
}

#[allow(dead_code)]
pub fn project_hit(slug: &str) -> RawHit {
    raw_hit(
        Some("project"),
        3.0,
        &[
            ("name", "Pip"),
            ("slug", slug),
            ("url", "https://readthedocs.org/projects/pip/"),
            ("description", "The package installer"),
        ],
    )
}

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}
