//! Canonical link resolution for page hits.
//!
//! A page link is the project's docs URL for the hit's version joined with the page's
//! relative path. Directory-style renderers serve `guide/` rather than `guide/index.html`,
//! so for those doctypes the index file is rewritten to its directory before joining.

use crate::metadata::ProjectMetadata;
use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Sphinx's dirhtml builder.
pub const SPHINX_HTMLDIR: &str = "sphinx_htmldir";

/// MkDocs, which always builds directory URLs.
pub const MKDOCS: &str = "mkdocs";

/// Doctypes treated as directory-style when nothing else is configured.
pub const DEFAULT_DIRECTORY_DOCTYPES: &[&str] = &[SPHINX_HTMLDIR, MKDOCS];

/// `index.html` as the final path segment.
static INDEX_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|/)index\.html$").expect("index pattern is valid"));

/// A resolved page link, split so that `domain + path` is the full URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    /// Scheme and host (with port, if any), without a trailing slash.
    pub domain: String,
    /// Absolute path, `/` at minimum.
    pub path: String,
}

impl DocLink {
    pub fn url(&self) -> String {
        format!("{}{}", self.domain, self.path)
    }
}

/// Builds page links from project metadata and doctype path rules.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    directory_doctypes: AHashSet<String>,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY_DOCTYPES.iter().copied())
    }
}

impl LinkResolver {
    pub fn new<S: Into<String>>(directory_doctypes: impl IntoIterator<Item = S>) -> Self {
        Self {
            directory_doctypes: directory_doctypes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether pages of this doctype are served as directories.
    pub fn is_directory_style(&self, doctype: Option<&str>) -> bool {
        doctype.is_some_and(|doctype| self.directory_doctypes.contains(doctype))
    }

    /// Resolve the link for a page at `full_path`.
    ///
    /// Returns `None` when no metadata is available or the joined URL does not parse.
    pub fn resolve(
        &self,
        metadata: Option<&ProjectMetadata>,
        full_path: &str,
        doctype: Option<&str>,
    ) -> Option<DocLink> {
        let metadata = metadata?;
        let path = if self.is_directory_style(doctype) {
            normalize_index_path(full_path)
        } else {
            full_path.to_string()
        };

        let full_url = join_url(metadata.docs_base_url(), &path);
        let link = split_url(&full_url);
        if link.is_none() {
            tracing::warn!("Docs URL '{}' could not be parsed, dropping link", full_url);
        }
        link
    }
}

/// Rewrite a trailing `index.html` segment to `/`. Only whole segments match.
pub fn normalize_index_path(path: &str) -> String {
    INDEX_FILE.replace(path, "/").into_owned()
}

/// Join a base URL and a relative path with exactly one `/`.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Split an absolute URL into its origin and path.
///
/// The path is taken verbatim from the input, up to any query or fragment, so that
/// `domain + path` reproduces the joined URL. Non-ASCII and space characters are not
/// percent-encoded and dot segments are kept.
pub fn split_url(full_url: &str) -> Option<DocLink> {
    let parsed = Url::parse(full_url).ok()?;
    parsed.host_str()?;

    let (scheme, rest) = full_url.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let (authority, path) = match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, "/"),
    };
    Some(DocLink {
        domain: format!("{}://{}", scheme, authority),
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::VersionMetadata;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn metadata(docs_url: &str) -> ProjectMetadata {
        ProjectMetadata {
            version: VersionMetadata {
                slug: "latest".to_string(),
                docs_url: docs_url.to_string(),
            },
            alias: None,
        }
    }

    #[rstest]
    #[case("guide/index.html", "guide/")]
    #[case("index.html", "/")]
    #[case("/index.html", "/")]
    #[case("guide/usage.html", "guide/usage.html")]
    #[case("myindex.html", "myindex.html")]
    #[case("guide/myindex.html", "guide/myindex.html")]
    #[case("index.html/extra", "index.html/extra")]
    #[case("indexhhtml", "indexhhtml")]
    fn test_normalize_index_path(#[case] input: &str, #[case] expected: &str) {
        check!(normalize_index_path(input) == expected);
    }

    #[rstest]
    #[case("https://a.io/en/latest/", "/guide/", "https://a.io/en/latest/guide/")]
    #[case("https://a.io/en/latest", "guide/", "https://a.io/en/latest/guide/")]
    #[case("https://a.io///", "///x.html", "https://a.io/x.html")]
    fn test_join_url(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        check!(join_url(base, path) == expected);
    }

    #[rstest]
    #[case("https://a.io/en/latest/guide/", "https://a.io", "/en/latest/guide/")]
    #[case("https://a.io", "https://a.io", "/")]
    #[case("http://localhost:8000/docs/", "http://localhost:8000", "/docs/")]
    #[case("https://a.io/es/latest/guía/", "https://a.io", "/es/latest/guía/")]
    #[case("https://a.io/en/latest/my page.html", "https://a.io", "/en/latest/my page.html")]
    #[case("https://a.io/en/latest/a/../b.html", "https://a.io", "/en/latest/a/../b.html")]
    fn test_split_url(#[case] input: &str, #[case] domain: &str, #[case] path: &str) {
        let_assert!(Some(link) = split_url(input));
        check!(link.domain == domain);
        check!(link.path == path);
        check!(link.url().trim_end_matches('/') == input.trim_end_matches('/'));
    }

    #[test]
    fn test_split_url_drops_query_and_fragment() {
        let_assert!(Some(link) = split_url("https://a.io/search.html?q=x#top"));
        check!(link.domain == "https://a.io");
        check!(link.path == "/search.html");
    }

    #[test]
    fn test_split_url_rejects_relative() {
        check!(split_url("/en/latest/").is_none());
    }

    #[rstest]
    #[case(Some(SPHINX_HTMLDIR), "guide/index.html", "/en/latest/guide/")]
    #[case(Some(MKDOCS), "index.html", "/en/latest/")]
    #[case(Some("sphinx"), "guide/index.html", "/en/latest/guide/index.html")]
    #[case(None, "guide/index.html", "/en/latest/guide/index.html")]
    #[case(Some(MKDOCS), "guide/usage.html", "/en/latest/guide/usage.html")]
    #[case(Some(SPHINX_HTMLDIR), "guía/index.html", "/en/latest/guía/")]
    fn test_resolve_by_doctype(
        #[case] doctype: Option<&str>,
        #[case] full_path: &str,
        #[case] expected_path: &str,
    ) {
        let resolver = LinkResolver::default();
        let meta = metadata("https://pip.readthedocs.io/en/latest/");

        let_assert!(Some(link) = resolver.resolve(Some(&meta), full_path, doctype));
        check!(link.domain == "https://pip.readthedocs.io");
        check!(link.path == expected_path);
    }

    #[test]
    fn test_resolve_without_metadata() {
        let resolver = LinkResolver::default();
        check!(resolver.resolve(None, "index.html", Some(MKDOCS)).is_none());
    }

    #[test]
    fn test_custom_directory_doctypes() {
        let resolver = LinkResolver::new(["custom_dirhtml"]);
        check!(resolver.is_directory_style(Some("custom_dirhtml")));
        check!(!resolver.is_directory_style(Some(MKDOCS)));
        check!(!resolver.is_directory_style(None));
    }
}
