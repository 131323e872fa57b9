use clap::Parser;
use docsearch_results::cli::{Cli, Commands, run_link, run_shape};
use docsearch_results::{Shaper, ShaperConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsearch_results::tracing::init(cli.log_format);

    let config = ShaperConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        "Loaded config with {} project(s), directory doctypes: {:?}",
        config.projects.len(),
        config.directory_doctypes
    );
    let shaper = Shaper::with_link_resolver(config.registry(), config.link_resolver());
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Shape {
            input,
            projects_data,
            pretty,
        } => run_shape(
            &shaper,
            input.as_deref(),
            projects_data.as_deref(),
            pretty,
            &mut stdout,
        ),
        Commands::Link {
            project,
            version_slug,
            path,
            doctype,
        } => run_link(
            &shaper,
            &project,
            &version_slug,
            &path,
            doctype.as_deref(),
            &mut stdout,
        ),
    }
}
