//! Site Migrate - Main Entry Point
//!
//! Offline commands around the migration engine. The actual implementation is
//! in the `site_migrate` library; workspace access comes from a platform
//! binding supplied by the embedding application.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use site_migrate::formatting::format_template;
use site_migrate::palette::transform_palette;
use site_migrate::{FileTemplateStore, MigrationConfig, TemplateStore};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site Migrate - extract, normalize and replay site templates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the migration config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a theme palette file to its JSON form
    Palette {
        /// Path to the palette markup file
        file: PathBuf,
    },
    /// Summarize the stored template
    Inspect {
        /// Only show lists whose title or URL contains this keyword
        #[arg(long)]
        list: Option<String>,

        /// Show field names of every list
        #[arg(long)]
        fields: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Some(command) = args.command else {
        // No subcommand provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => MigrationConfig::load(path)?,
        None => MigrationConfig::default(),
    };

    match command {
        Command::Palette { file } => {
            let xml = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read palette file {}", file.display()))?;
            let palette = transform_palette(&xml)?.to_json()?;
            println!("{}", serde_json::to_string_pretty(&palette)?);
        }
        Command::Inspect { list, fields } => {
            let store = FileTemplateStore::new(&config.store.directory);
            let template = store.load(&config.store.file_name)?;
            print!("{}", format_template(&template, list.as_deref(), fields));
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
