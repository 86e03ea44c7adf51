//! oneseat CLI — manage the rule table and dry-run mount scenarios.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use oneseat::config::{self, Config};
use oneseat::messages::LogSink;
use oneseat::policy::MountDecision;
use oneseat::scenario::load_scenario;
use oneseat::store::RuleStore;

/// oneseat — vehicle mount gate.
#[derive(Parser)]
#[command(name = "oneseat", version, about)]
struct Cli {
    /// Config file (default: `$ONESEAT_CONFIG_PATH` or `~/.oneseat/oneseat.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Write the default rule table.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Print the active rule table in match order.
    Rules {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a mount scenario file.
    Check {
        /// Path to the scenario TOML.
        scenario: PathBuf,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Keep the rule table loaded and reload it on every change.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match cli.command {
        Command::Init { force } => {
            oneseat::logging::init_cli();
            handle_init(&config_path, force)
        }
        Command::Rules { json } => {
            oneseat::logging::init_cli();
            handle_rules(&config_path, json)
        }
        Command::Check { scenario, json } => {
            oneseat::logging::init_cli();
            handle_check(&config_path, &scenario, json)
        }
        Command::Watch => handle_watch(&config_path).await,
    }
}

/// Write the default config, refusing to clobber an existing one.
fn handle_init(config_path: &Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }
    config::save_config(config_path, &Config::default())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("wrote default rules to {}", config_path.display());
    Ok(())
}

/// Print the rule table.
fn handle_rules(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = RuleStore::open(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let table = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(table.rules())?);
        return Ok(());
    }

    if table.is_empty() {
        println!("no vehicle types are regulated");
    }
    for (index, rule) in table.rules().iter().enumerate() {
        println!(
            "{index}: {match_} driver={driver} passenger={passenger} teammates={teammates}",
            match_ = rule.vehicle_type_match,
            driver = rule.prevent_if_driver_present,
            passenger = rule.prevent_if_passenger_present,
            teammates = rule.allow_teammates,
        );
    }
    Ok(())
}

/// Run one scenario through the gate and print the decision.
fn handle_check(config_path: &Path, scenario_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = Arc::new(
        RuleStore::open(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?,
    );
    let scenario = load_scenario(scenario_path)?;
    let gate = scenario.gate(store, Arc::new(LogSink));
    let decision = gate.can_mount(scenario.actor, Some(&scenario.mountable()));

    if json {
        let value = match &decision {
            MountDecision::Allow => serde_json::json!({ "decision": "allow" }),
            MountDecision::Deny(reason) => {
                serde_json::json!({ "decision": "deny", "reason": reason })
            }
        };
        println!("{value}");
    } else {
        match &decision {
            MountDecision::Allow => println!("allow"),
            MountDecision::Deny(reason) => println!("deny: {reason}"),
        }
    }
    Ok(())
}

/// Hold the rule table with hot reload until interrupted.
async fn handle_watch(config_path: &Path) -> anyhow::Result<()> {
    let logs_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("logs");
    let _logging_guard = oneseat::logging::init_production(&logs_dir)?;

    let store = RuleStore::watch(config_path)
        .with_context(|| format!("failed to watch {}", config_path.display()))?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!(rules = store.snapshot().len(), "shutting down");
    Ok(())
}
