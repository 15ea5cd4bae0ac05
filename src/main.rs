/// Hook indexer configuration entry point
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use indexer_core::service::launch;
use indexer_core::JsonExport;
use indexer_ethereum::{ContractAbi, DeploymentArtifact};
use indexer_tools::config::{ConfigManager, LogConfig};
use indexer_tools::logging::init_tracing;

#[derive(Parser)]
#[command(name = "hook-indexer")]
#[command(author, version, about = "Resolve deployment artifacts into an indexing configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the indexing configuration and emit it as JSON
    Build {
        /// Settings file path
        #[arg(short, long, default_value = "indexer.toml")]
        config: PathBuf,

        /// Write the configuration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve the address and start block of a deployment artifact
    Resolve {
        /// Broadcast record, e.g. broadcast/<script>/<chain>/run-latest.json
        artifact: PathBuf,
    },

    /// List the events of an ABI file with their topic hashes
    Abi {
        /// ABI JSON file
        file: PathBuf,
    },

    /// Manage settings files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a settings file
    Validate {
        /// Settings file to validate
        file: PathBuf,
    },

    /// Generate a settings file with the reference layout
    Generate {
        /// Output file path
        output: PathBuf,
    },

    /// Show the effective settings after environment overrides
    Show {
        /// Settings file
        #[arg(short, long, default_value = "indexer.toml")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { config, output } => handle_build(&config, output.as_deref()),
        Commands::Resolve { artifact } => {
            init_tracing(&LogConfig::default())?;
            handle_resolve(&artifact)
        }
        Commands::Abi { file } => {
            init_tracing(&LogConfig::default())?;
            handle_abi(&file)
        }
        Commands::Config { action } => {
            init_tracing(&LogConfig::default())?;
            handle_config_command(action)
        }
    }
}

fn handle_build(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let manager = ConfigManager::load_from_file(config_path)?;
    init_tracing(&manager.settings().logging)?;

    info!(config = %config_path.display(), "Assembling indexing configuration");
    let config = manager
        .assemble()
        .with_context(|| format!("Failed to assemble configuration from {}", config_path.display()))?;

    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            launch(&mut JsonExport::new(BufWriter::new(file)), &config)?;
            info!(output = %path.display(), "Configuration written");
        }
        None => launch(&mut JsonExport::new(io::stdout().lock()), &config)?,
    }

    Ok(())
}

fn handle_resolve(artifact: &Path) -> Result<()> {
    let resolved = DeploymentArtifact::load(artifact)?.resolve()?;

    println!("address:      {}", resolved.checksummed_address());
    println!("start height: {}", resolved.start_height);

    Ok(())
}

fn handle_abi(file: &Path) -> Result<()> {
    let abi = ContractAbi::load(file)?;
    let events = abi.events()?;

    if events.is_empty() {
        println!("No events in {}", file.display());
    }

    for event in events {
        let anonymous = if event.anonymous { " (anonymous)" } else { "" };
        println!("{}  {}{}", event.topic(), event.signature(), anonymous);
    }

    Ok(())
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Validate { file } => {
            println!("🔍 Validating configuration file: {}", file.display());

            let manager = ConfigManager::load_from_file(&file)?;
            if let Err(errors) = manager.validate() {
                println!("❌ Configuration validation failed:");
                for error in &errors {
                    println!("  - {}", error);
                }
                bail!("{} validation error(s) in {}", errors.len(), file.display());
            }

            let settings = manager.settings();
            println!("✅ Configuration file is valid");
            println!("  Networks Configured: {}", settings.networks.len());
            for (name, network) in &settings.networks {
                println!("    - {} (chain {}, {})", name, network.chain_id, network.rpc_url);
            }
            println!("  Contracts Configured: {}", settings.contracts.len());
            for name in settings.contracts.keys() {
                println!("    - {}", name);
            }
            println!("  Logging Level: {}", settings.logging.level);
        }

        ConfigAction::Generate { output } => {
            ConfigManager::generate_default_config(&output)?;
            println!("✅ Generated default configuration: {}", output.display());
            println!("💡 Use 'hook-indexer config validate {}' to validate your changes", output.display());
        }

        ConfigAction::Show { file } => {
            let manager = ConfigManager::load_from_file(&file)?;
            println!("{}", serde_json::to_string_pretty(manager.settings())?);
        }
    }

    Ok(())
}
