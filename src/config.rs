//! Shaper configuration: link rules and the static project registry.
//!
//! Loaded from TOML. Without an explicit path the user config directory is tried, and
//! built-in defaults apply when no file exists there either.

use crate::error::Result;
use crate::link::{DEFAULT_DIRECTORY_DOCTYPES, LinkResolver};
use crate::metadata::{RegistryProject, StaticRegistry};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory under the user config dir holding `config.toml`.
const CONFIG_DIR_NAME: &str = "docsearch-results";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaperConfig {
    /// Doctypes whose pages are served as directories.
    #[serde(default = "default_directory_doctypes")]
    pub directory_doctypes: Vec<String>,
    /// Projects known to the static registry.
    #[serde(default)]
    pub projects: Vec<RegistryProject>,
}

fn default_directory_doctypes() -> Vec<String> {
    DEFAULT_DIRECTORY_DOCTYPES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            directory_doctypes: default_directory_doctypes(),
            projects: Vec::new(),
        }
    }
}

impl ShaperConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse shaper config")?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }

    /// Load from `path`, or from the default location when none is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(Path::new(expand_tilde(path).as_ref()));
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using config at {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            validate_slug(&project.slug)?;
            validate_docs_domain(&project.docs_domain)
                .with_context(|| format!("Project '{}'", project.slug))?;
            if !seen.insert(project.slug.as_str()) {
                anyhow::bail!("Project '{}' is configured more than once", project.slug);
            }
        }
        Ok(())
    }

    pub fn registry(&self) -> StaticRegistry {
        StaticRegistry::new(self.projects.iter().cloned())
    }

    pub fn link_resolver(&self) -> LinkResolver {
        LinkResolver::new(self.directory_doctypes.iter().cloned())
    }
}

/// `$XDG_CONFIG_HOME/docsearch-results/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Validate project slug contains only safe characters
pub fn validate_slug(slug: &str) -> Result<()> {
    let slug_regex = regex::Regex::new(r"^[a-z0-9_-]+$")?;
    if !slug_regex.is_match(slug) {
        anyhow::bail!(
            "Invalid project slug '{}': must contain only lowercase alphanumeric characters, hyphens, and underscores",
            slug
        );
    }
    Ok(())
}

/// Validate docs domain is an absolute URL with a host
pub fn validate_docs_domain(domain: &str) -> Result<()> {
    let parsed =
        Url::parse(domain).with_context(|| format!("Invalid docs domain '{}'", domain))?;
    if parsed.host_str().is_none() {
        anyhow::bail!("Invalid docs domain '{}': missing host", domain);
    }
    Ok(())
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
