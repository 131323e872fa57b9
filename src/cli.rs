use crate::error::Result;
use crate::hit::RawHit;
use crate::metadata::{ProjectMetadata, ProjectRegistry, SessionCache};
use crate::shape::Shaper;
use crate::tracing::LogFormat;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docsearch-results")]
#[command(about = "Shape raw documentation search hits into ranked results", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shape a JSON array of raw hits from a file or stdin
    Shape {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// JSON map of project slug to pre-resolved project metadata
        #[arg(long)]
        projects_data: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Resolve the canonical link for a single page
    Link {
        #[arg(short, long)]
        project: String,
        #[arg(short = 'v', long = "version")]
        version_slug: String,
        #[arg(long)]
        path: String,
        #[arg(short, long)]
        doctype: Option<String>,
    },
}

/// Shape hits read from `input` (stdin when `None`) and write the results as a JSON array.
///
/// Hits that fail to shape are logged and left out of the output.
pub fn run_shape<R: ProjectRegistry>(
    shaper: &Shaper<R>,
    input: Option<&Path>,
    projects_data: Option<&Path>,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hits from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read hits from stdin")?;
            buf
        }
    };
    let hits: Vec<RawHit> = serde_json::from_str(&raw).context("Failed to parse raw hits")?;

    let cache = match projects_data {
        Some(path) => SessionCache::with_projects(read_projects_data(path)?),
        None => SessionCache::new(),
    };

    let mut session = shaper.session_with(cache);
    let shaped = session.shape_all(&hits);
    let total = shaped.len();
    let results: Vec<_> = shaped.into_iter().filter_map(|result| result.ok()).collect();
    tracing::info!(
        "Shaped {} of {} hit(s), resolved {} project(s)",
        results.len(),
        total,
        session.cache().len()
    );

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &results)?;
    } else {
        serde_json::to_writer(&mut *out, &results)?;
    }
    writeln!(out)?;
    Ok(())
}

fn read_projects_data(path: &Path) -> Result<HashMap<String, ProjectMetadata>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read projects data from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid projects data in {}", path.display()))
}

/// Resolve one page link and print its domain, path and project alias.
pub fn run_link<R: ProjectRegistry>(
    shaper: &Shaper<R>,
    project: &str,
    version_slug: &str,
    path: &str,
    doctype: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = shaper.session();
    let Some(metadata) = session.resolve_metadata(project, version_slug) else {
        anyhow::bail!("Project '{}' is not configured", project);
    };
    let Some(link) = shaper.link_resolver().resolve(Some(metadata), path, doctype) else {
        anyhow::bail!("Could not build a link for '{}' in '{}'", path, project);
    };

    writeln!(out, "domain: {}", link.domain)?;
    writeln!(out, "path:   {}", link.path)?;
    if let Some(alias) = &metadata.alias {
        writeln!(out, "alias:  {}", alias)?;
    }
    Ok(())
}
