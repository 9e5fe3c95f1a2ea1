use anyhow::{Context, Result};
use citation_relations::config::{find_config_file, get_config, load_config, Config};
use citation_relations::models::Direction;
use citation_relations::relations::{RelationError, RelationExpander, RelationResolver};
use citation_relations::ui;
use citation_relations::utils::RelationProgress;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Citation Relations - list the works a DOI cites, or the works citing it
#[derive(Parser, Debug)]
#[command(name = "citation-relations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve the citing and cited-by works of a DOI", long_about = None)]
struct Cli {
    /// DOI of the work to investigate
    doi: String,

    /// Which relation to resolve
    #[arg(long, short, value_enum, default_value_t = Relation::CitedBy)]
    direction: Relation,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum DOI lookups in flight (overrides the configuration)
    #[arg(long)]
    concurrency: Option<usize>,
}

/// Relation to resolve
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    /// Works the DOI cites
    Citing,
    /// Works citing the DOI
    CitedBy,
}

impl From<Relation> for Direction {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Citing => Direction::Citing,
            Relation::CitedBy => Direction::CitedBy,
        }
    }
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if ui::is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citation_relations={}", level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        load_config(&path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        get_config().context("Invalid configuration in environment")?
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = read_config(&cli)?;
    init_tracing(&cli, &config);

    let direction = Direction::from(cli.direction);
    let output = cli.output.resolve();

    let mut resolver = RelationResolver::from_config(&config)?;
    if let Some(limit) = cli.concurrency {
        resolver = resolver.with_expander(RelationExpander::new(limit));
    }

    let show_bar = !cli.quiet && output != OutputFormat::Json;
    let bar = ui::create_progress_bar("Resolving DOIs");
    if !show_bar {
        bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    let progress = {
        let bar = bar.clone();
        RelationProgress::new().on_update(move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
    };

    let started = Instant::now();
    let expansion = match resolver
        .resolve_relations_detailed(cli.doi.as_str(), direction, &progress)
        .await
    {
        Ok(expansion) => expansion,
        Err(err @ (RelationError::Connectivity(_) | RelationError::Service(_))) => {
            bar.finish_and_clear();
            ui::print_error(&err.to_string());
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };
    bar.finish_and_clear();

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&expansion)?);
        }
        OutputFormat::Plain => {
            for paper in &expansion.papers {
                ui::print_paper_plain(paper);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !cli.quiet {
                ui::print_relations_header(
                    &cli.doi,
                    direction,
                    expansion.papers.len(),
                    started.elapsed(),
                );
            }
            for (i, paper) in expansion.papers.iter().enumerate() {
                ui::print_paper(i + 1, paper);
            }
        }
    }

    if !cli.quiet && output != OutputFormat::Json {
        ui::print_failures(&expansion.failures);
    }

    Ok(())
}
