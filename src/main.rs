use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use safetybot_gate::cli::Console;
use safetybot_gate::config::GateConfig;
use safetybot_gate::core::AgentAction;
use safetybot_gate::gate::{ActionGate, BatchValidation};
use safetybot_gate::logging;
use safetybot_gate::permissions::{get_available_features, FeaturePermissions};
use safetybot_gate::registry::ActionRegistry;

/// Policy checks for SafetyBot agent actions
#[derive(Parser, Debug)]
#[command(name = "safetybot-gate", version, about)]
struct Cli {
    /// Gate configuration file (defaults to $SAFETYBOT_GATE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a batch of planned actions against a permission matrix
    Check {
        /// JSON file with `permissions` and `actions`
        request: PathBuf,
    },
    /// List the features a permission matrix can read
    Features {
        /// JSON permission matrix
        permissions: PathBuf,
    },
    /// List known action templates
    Templates {
        /// Only show templates available to this permission matrix
        #[arg(long)]
        permissions: Option<PathBuf>,
    },
}

/// Input of the `check` command
#[derive(Debug, Deserialize)]
struct CheckRequest {
    #[serde(default)]
    permissions: FeaturePermissions,
    actions: Vec<AgentAction>,
}

/// Output of the `check` command in JSON mode
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    #[serde(flatten)]
    batch: &'a BatchValidation,
    requires_confirmation: Vec<bool>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_gate(config: Option<&Path>) -> Result<ActionGate> {
    let config = match config {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::from_env()?,
    };
    Ok(ActionGate::from_config(&config)?)
}

fn run(cli: Cli, console: &Console) -> Result<()> {
    let gate = load_gate(cli.config.as_deref())?;

    match cli.command {
        Command::Check { request } => {
            let request: CheckRequest = read_json(&request)?;
            tracing::info!("Checking {} planned actions", request.actions.len());

            let batch = gate.validate_batch(&request.actions, &request.permissions);

            if cli.json {
                let report = CheckReport {
                    batch: &batch,
                    requires_confirmation: batch
                        .valid
                        .iter()
                        .map(|a| gate.requires_confirmation(a))
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                console.print_batch(&batch, |a| gate.requires_confirmation(a));
            }
        }

        Command::Features { permissions } => {
            let matrix: FeaturePermissions = read_json(&permissions)?;
            let features = get_available_features(&matrix);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&features)?);
            } else {
                console.print_features(&features);
            }
        }

        Command::Templates { permissions } => {
            let registry = ActionRegistry::with_builtin_templates();
            let templates = match permissions {
                Some(path) => {
                    let matrix: FeaturePermissions = read_json(&path)?;
                    registry.available_templates(&matrix)
                }
                None => registry.templates().cloned().collect(),
            };

            if cli.json {
                let plain: Vec<_> = templates.iter().map(|t| &**t).collect();
                println!("{}", serde_json::to_string_pretty(&plain)?);
            } else {
                console.print_templates(templates.iter().map(|t| &**t));
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Dropping the guard flushes the file writer
    let _log_guard = match &cli.log_dir {
        Some(dir) => Some(logging::init_file_logging(dir)?),
        None => {
            logging::init_logging()?;
            None
        }
    };

    let console = Console::new();

    if let Err(e) = run(cli, &console) {
        console.print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
