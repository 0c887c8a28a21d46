//! Chartify Views - CLI
//!
//! Generates the workforce fixture and prints the summary views chart adapters consume.

use anyhow::{Context, Result};
use chartify_views::config::ChartifyConfig;
use chartify_views::data::{DataLoader, DatasetGenerator, TableRow};
use chartify_views::stats::{Aggregator, DashboardViews};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "chartify_views")]
#[command(about = "Summary views over workforce & allocation data for chart adapters")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the fixture JSON files
    Generate {
        /// Output directory (defaults to output.data_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the random number generator
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of people to generate
        #[arg(long)]
        people: Option<usize>,

        /// Number of allocations to generate
        #[arg(long)]
        allocations: Option<usize>,
    },

    /// Print every dashboard view as JSON
    Summarize {
        /// Directory with fixture files; generated from config when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Seed used when generating
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Pivot an arbitrary CSV or JSON table into per-period rows
    Table {
        /// CSV file, or JSON array of objects
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding the period label
        #[arg(short, long, default_value = "month")]
        time: String,

        /// Metric columns (comma-separated); all other columns when omitted
        #[arg(short, long)]
        metrics: Option<String>,
    },

    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "chartify.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartify_views=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ChartifyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartifyConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            output,
            seed,
            people,
            allocations,
        } => {
            if let Some(seed) = seed {
                config.dataset.seed = seed;
            }
            if let Some(people) = people {
                config.dataset.people = people;
            }
            if let Some(allocations) = allocations {
                config.dataset.allocations = allocations;
            }
            let dir = output.unwrap_or_else(|| config.output.data_dir.clone());

            let dataset = DatasetGenerator::new(config.dataset.clone()).generate()?;
            DataLoader::save_dataset(&dataset, &dir, config.output.pretty)?;
            info!(
                dir = %dir.display(),
                people = dataset.people.len(),
                allocations = dataset.allocations.len(),
                "Fixture written"
            );
        }
        Commands::Summarize { data, seed } => {
            if let Some(seed) = seed {
                config.dataset.seed = seed;
            }
            let dataset = match data {
                Some(dir) => DataLoader::load_dataset(&dir)?,
                None => DatasetGenerator::new(config.dataset.clone()).generate()?,
            };
            print_json(&DashboardViews::compute(&dataset), config.output.pretty)?;
        }
        Commands::Table {
            input,
            time,
            metrics,
        } => {
            let rows = load_table(&input)?;
            let metrics: Vec<String> = match metrics {
                Some(list) => list
                    .split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect(),
                None => rows
                    .first()
                    .map(|row| {
                        row.columns()
                            .filter(|c| *c != time)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            };
            info!(time = %time, metrics = ?metrics, rows = rows.len(), "Pivoting table");

            let pivot = Aggregator::pivot_time_series(&rows, &time, &metrics);
            print_json(&pivot, config.output.pretty)?;
        }
        Commands::Init { output } => {
            config.save(&output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(())
}

fn load_table(path: &Path) -> Result<Vec<TableRow>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        return Ok(DataLoader::load_table_json(path)?);
    }

    let mut loader = DataLoader::new();
    loader.load_csv(path)?;
    Ok(loader.to_table_rows()?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
