// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use grantee_heatmap::config::{DEFAULT_GEOCODER_URL, DEFAULT_OUTPUT_FILE, DEFAULT_SOURCE_URL};
use grantee_heatmap::{PipelineConfig, WeightMode};

#[derive(Parser)]
#[command(
    name = "grantee-heatmap",
    about = "Scrape grantee locations, geocode them, and render a density heatmap",
    version,
    after_help = "Run with no arguments to map the XRPL grantees page."
)]
struct Cli {
    /// Grantee listing page to scrape
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    url: String,

    /// Output HTML file (overwritten if it exists)
    #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Nominatim-compatible geocoder base URL
    #[arg(long, default_value = DEFAULT_GEOCODER_URL)]
    geocoder_url: String,

    /// How heat intensity is counted per coordinate
    #[arg(long, value_enum, default_value_t = WeightArg::Mentions)]
    weight: WeightArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightArg {
    /// Count every mention of a location on the page
    Mentions,
    /// Count each distinct location label once
    DistinctLabels,
}

impl From<WeightArg> for WeightMode {
    fn from(w: WeightArg) -> Self {
        match w {
            WeightArg::Mentions => WeightMode::Mentions,
            WeightArg::DistinctLabels => WeightMode::DistinctLabels,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "grantee-heatmap", &mut std::io::stdout());
        return Ok(());
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig {
        source_url: cli.url,
        geocoder_url: cli.geocoder_url,
        weight_mode: cli.weight.into(),
        output_path: cli.output,
        ..PipelineConfig::default()
    };

    println!("Building grantee heatmap from {}", config.source_url);

    match grantee_heatmap::run(&config).await {
        Ok(summary) => {
            println!(
                "  Scraped {} locations ({} distinct), geocoded {}, skipped {}",
                summary.labels_scraped,
                summary.distinct_labels,
                summary.geocoded,
                summary.skipped.len()
            );
            if !summary.skipped.is_empty() {
                println!("  Skipped: {}", summary.skipped.join(", "));
            }
            println!(
                "  Heatmap generated successfully! Open '{}' in your web browser to view it.",
                summary.output.display()
            );
            Ok(())
        }
        Err(e) => {
            // Consistent exit codes: 0=success, 1=error
            eprintln!("  Error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }
}
