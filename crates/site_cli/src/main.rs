//! Site CLI
//!
//! Scores request files against the site engine and prints ranked reports.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "site_cli")]
#[command(about = "Score bedding, feeding, stand and camera sites from request JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single request file
    Score {
        /// Input request JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output response JSON file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Engine config file (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Evaluate a JSON array of requests in parallel
    Batch {
        /// Input JSON array file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output JSON file path
        #[arg(long)]
        out: PathBuf,

        /// Engine config file (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print a config preset
    Config {
        /// Preset name
        #[arg(long, default_value = "default", value_parser = ["default", "flatland", "mountain"])]
        preset: String,

        /// Output format
        #[arg(long, default_value = "yaml", value_parser = ["json", "yaml"])]
        format: String,
    },

    /// Print the request JSON Schema
    Schema,
}

#[cfg(feature = "cli")]
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score { r#in, out, config, pretty } => {
            let engine_config = site_cli::load_config(config.as_deref())?;
            let response = site_cli::run_score(&r#in, &engine_config, pretty)?;

            match out {
                Some(path) => {
                    eprintln!("🎯 Scoring {}", r#in.display());
                    site_cli::write_output(Some(&path), &response)?;
                    for line in site_cli::summary_lines(&response)? {
                        eprintln!("   {line}");
                    }
                    eprintln!("\n✅ Report written to: {}", path.display());
                }
                None => site_cli::write_output(None, &response)?,
            }
        }

        Commands::Batch { r#in, out, config, pretty } => {
            eprintln!("🎯 Scoring batch {}", r#in.display());
            let engine_config = site_cli::load_config(config.as_deref())?;
            let (response, summary) = site_cli::run_batch(&r#in, &engine_config, pretty)?;
            site_cli::write_output(Some(&out), &response)?;

            eprintln!("\n✅ Batch complete");
            eprintln!("   Requests: {}", summary.total);
            eprintln!("   Ok:       {}", summary.ok);
            eprintln!("   Failed:   {}", summary.failed);
            eprintln!("   Output:   {}", out.display());
        }

        Commands::Config { preset, format } => {
            let rendered = site_cli::render_config(&preset, &format)?;
            site_cli::write_output(None, &rendered)?;
        }

        Commands::Schema => {
            site_cli::write_output(None, &site_cli::render_schema()?)?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("site_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
