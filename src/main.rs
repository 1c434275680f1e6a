//! PlateLedger - motorcycle plate OCR and status tracking
//!
//! Reads plate number and region off OCR output and keeps a status record
//! (blacklisted, expired, violations) per plate.

mod app;
mod config;
mod shared;
mod storage;
mod vision;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::Session;
use crate::config::AppConfig;
use crate::shared::ActionOutcome;
use crate::storage::{NewRecord, StatusFlag};
use crate::vision::SavedResponseProvider;

/// PlateLedger - motorcycle plate status tracking
#[derive(Parser, Debug)]
#[command(name = "plate-ledger")]
#[command(about = "Track blacklisted, expired and violation status of motorcycle plates")]
struct Args {
    /// Configuration file (defaults to config.toml in the config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default configuration file
    InitConfig,
    #[command(flatten)]
    Plate(PlateCommand),
}

/// Commands that run against the record store
#[derive(Subcommand, Debug)]
enum PlateCommand {
    /// Register a new plate
    Insert {
        plate: String,
        region: String,
        #[arg(long)]
        blacklisted: bool,
        #[arg(long)]
        expired: bool,
        #[arg(long)]
        violations: bool,
    },
    /// Set a status flag (blacklisted, expired, violations)
    Flag { plate: String, flag: StatusFlag },
    /// Clear all status flags
    Clear { plate: String },
    /// Show a plate's record
    Find { plate: String },
    /// Delete a plate's record
    Delete { plate: String },
    /// Read plate fields from an image's saved OCR response
    Scan { image: PathBuf },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let (mut config, source) = load_or_create_config(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &source {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("Using default configuration"),
    }

    let command = match args.command {
        Command::InitConfig => return init_config(args.config),
        Command::Plate(command) => command,
    };

    if let Some(path) = args.database {
        config.database.path = Some(path);
    }

    let session = Session::open(config)?;
    let code = run(&session, command, args.json)?;
    session.close();

    Ok(code)
}

fn init_config(explicit: Option<PathBuf>) -> Result<ExitCode> {
    let path = match explicit {
        Some(path) => path,
        None => storage::get_config_dir()?.join("config.toml"),
    };
    config::save_config(&AppConfig::default(), &path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run(session: &Session, command: PlateCommand, json: bool) -> Result<ExitCode> {
    let outcome = match command {
        PlateCommand::Insert {
            plate,
            region,
            blacklisted: false,
            expired: false,
            violations: false,
        } => session.register(&plate, &region),
        PlateCommand::Insert {
            plate,
            region,
            blacklisted,
            expired,
            violations,
        } => session.insert(
            NewRecord::new(plate, region)
                .with_flag(StatusFlag::Blacklisted, blacklisted)
                .with_flag(StatusFlag::Expired, expired)
                .with_flag(StatusFlag::Violations, violations),
        ),
        PlateCommand::Flag { plate, flag } => session.flag(&plate, flag),
        PlateCommand::Clear { plate } => session.clear(&plate),
        PlateCommand::Find { plate } => session.lookup(&plate),
        PlateCommand::Delete { plate } => session.remove(&plate),
        PlateCommand::Scan { image } => {
            let provider = SavedResponseProvider::new(&session.config().ocr.response_extension);
            let report = session.scan(&provider, &image)?;
            if json {
                print_json(&report)?;
            } else {
                print_scan(&report);
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    if json {
        print_json(&outcome)?;
    } else {
        println!("{}", outcome);
    }

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &ActionOutcome) -> ExitCode {
    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_scan(report: &app::ScanReport) {
    if report.fields.is_empty() {
        println!("No text found.");
        return;
    }

    println!("Detected Plate Number: {}", report.fields.plate_number);
    println!("Detected Region:       {}", report.fields.region);

    let view = &report.view;
    let mut enabled = Vec::new();
    if view.can_register {
        enabled.push("insert".to_string());
    }
    for flag in StatusFlag::ALL {
        if view.can_set(flag) {
            enabled.push(format!("flag {}", flag));
        }
    }
    if view.can_delete {
        enabled.extend(["clear".to_string(), "delete".to_string()]);
    }
    println!("Available actions:     {}", enabled.join(", "));

    for note in &view.notes {
        println!("  {}", note);
    }
}

/// Load configuration from file or fall back to defaults
///
/// Also returns the file the configuration came from, if any.
fn load_or_create_config(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => storage::get_config_dir()
            .ok()
            .map(|dir| dir.join("config.toml")),
    };

    match path {
        Some(path) if path.exists() => {
            let config = config::load_config(&path)
                .with_context(|| format!("Invalid configuration at {:?}", path))?;
            Ok((config, Some(path)))
        }
        _ => Ok((AppConfig::default(), None)),
    }
}
