use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mdh_connector::HubConfig;
use mdh_connector::query::{ListFilter, translate, translate_quarantine};
use mdh_connector::repository::describe_universes;
use mdh_connector::schema::Universe;

#[derive(Parser)]
#[command(name = "mdh-connector")]
#[command(about = "Inspect how hub universes and filters translate for the host runtime")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the type catalogue synthesized from universe definitions
    Describe {
        /// JSON file holding one universe or a list of universes
        #[arg(long)]
        universe: PathBuf,
    },
    /// Print the hub query a host list filter translates to
    Filter {
        /// JSON file holding the list filter
        #[arg(long)]
        filter: PathBuf,
        /// Translate as a quarantine query instead of a golden-record query
        #[arg(long)]
        quarantine: bool,
    },
    /// Load and validate the hub connection configuration
    CheckConfig {
        /// Config file; defaults to the user config directory
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Describe { universe } => describe(&universe),
        Commands::Filter { filter, quarantine } => filter_request(&filter, quarantine),
        Commands::CheckConfig { config } => check_config(config.as_deref()),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn describe(path: &Path) -> Result<()> {
    let value = read_json(path)?;
    let universes: Vec<Universe> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    let types = describe_universes(&universes);
    println!("{}", serde_json::to_string_pretty(&types)?);
    Ok(())
}

fn filter_request(path: &Path, quarantine: bool) -> Result<()> {
    let filter: ListFilter = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} is not a list filter", path.display()))?;

    let output = if quarantine {
        serde_json::to_string_pretty(&translate_quarantine(Some(&filter))?)?
    } else {
        serde_json::to_string_pretty(&translate(Some(&filter))?)?
    };
    println!("{}", output);
    Ok(())
}

fn check_config(path: Option<&Path>) -> Result<()> {
    let config = HubConfig::load(path)?;
    config.validate()?;
    log::info!("Hub configuration for {} is complete", config.hostname);
    println!("{}@{}", config.username, config.hostname);
    Ok(())
}
