use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use placements_core::{PlacementService, UploadOutcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "placements")]
#[command(about = "Advertising placement locator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a placement definition file and report problems
    Check {
        /// Definition file, one `<placement>:<loc1>,<loc2>` entry per line
        file: PathBuf,
    },
    /// Load a definition file and list the placements visible at a location
    Lookup {
        /// Definition file, one `<placement>:<loc1>,<loc2>` entry per line
        file: PathBuf,
        /// Location to search, e.g. /eu/de/berlin
        location: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("placements_core=warn".parse()?)
                .add_directive("placements=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { file }) => {
            let outcome = load(&PlacementService::new(), &file)?;
            print!("{}", render_outcome(&outcome));
        }
        Some(Commands::Lookup { file, location }) => {
            for placement in lookup(&file, &location)? {
                println!("{}", placement);
            }
        }
        None => {
            println!("Use 'placements --help' for commands");
        }
    }

    Ok(())
}

/// Loads `path` into `service`, replacing whatever it served before.
fn load(service: &PlacementService, path: &Path) -> anyhow::Result<UploadOutcome> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let outcome = service
        .replace_index_from_reader(BufReader::new(file))
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(
        "loaded {}: {} lines processed, {} locations",
        path.display(),
        outcome.processed_lines,
        outcome.distinct_locations
    );
    Ok(outcome)
}

fn lookup(path: &Path, location: &str) -> anyhow::Result<Vec<String>> {
    let service = PlacementService::new();
    load(&service, path)?;
    let result = service.lookup(location)?;
    Ok(result
        .placements
        .into_iter()
        .map(|p| p.into_string())
        .collect())
}

fn render_outcome(outcome: &UploadOutcome) -> String {
    let mut out = format!(
        "Processed lines: {}\nDistinct locations: {}\n",
        outcome.processed_lines, outcome.distinct_locations
    );
    for error in &outcome.errors {
        out.push_str(&format!("Error: {}\n", error));
    }
    if let Some(warning) = &outcome.warning {
        out.push_str(&format!("Warning: {}\n", warning));
    }
    out
}
