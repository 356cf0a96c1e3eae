//! frontline-sync - build and refresh the per-day timeline
//!
//! # Usage
//!
//! ```bash
//! # Rebuild everything from the remote listing
//! frontline-sync --generate
//!
//! # Fetch only missing days (plus the newest one)
//! frontline-sync --update
//!
//! # Print the symbol code every unit would get
//! frontline-sync --sidc
//!
//! # Recompute symbol codes in base.json
//! frontline-sync --force
//! ```
//!
//! # Environment Variables
//!
//! - `DATA_REPO_API_URL`: remote listing URL (also read from `.env`)
//! - `FRONTLINE_SYNC_CONFIG`: path to a TOML config file
//! - `FRONTLINE_DATA_DIR`: state directory override
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::info;

use frontline_sync::classify::SidcClassifier;
use frontline_sync::config::SyncConfig;
use frontline_sync::sync::{check_classification, force_classification};
use frontline_sync::{Orchestrator, ProcessLock, StateDir, SyncOutcome};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "frontline-sync")]
#[command(about = "Day-by-day timeline builder for frontline map archives")]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["generate", "update", "sidc", "force"]),
))]
struct CliArgs {
    /// Generate all data from scratch
    #[arg(short, long)]
    generate: bool,

    /// Update missing dates (and refresh the newest one)
    #[arg(short, long)]
    update: bool,

    /// Check unit symbol codes without writing anything
    #[arg(short, long)]
    sidc: bool,

    /// Recompute unit symbol codes and rewrite base.json
    #[arg(short, long)]
    force: bool,

    /// Path to a TOML config file (overrides FRONTLINE_SYNC_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// State directory (overrides config and FRONTLINE_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Number of concurrent archive downloads
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Generate,
    Update,
    CheckSidc,
    ForceSidc,
}

impl CliArgs {
    const fn mode(&self) -> Mode {
        if self.generate {
            Mode::Generate
        } else if self.update {
            Mode::Update
        } else if self.sidc {
            Mode::CheckSidc
        } else {
            Mode::ForceSidc
        }
    }

    fn load_config(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if let Err(e) = dotenvy::dotenv() {
                    tracing::debug!(error = %e, "No .env file loaded");
                }
                let mut config = SyncConfig::load_from_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                config.apply_env_overrides();
                config
            }
            None => SyncConfig::load(),
        };

        if let Some(dir) = &self.data_dir {
            config.storage.data_dir.clone_from(dir);
        }
        if let Some(workers) = self.workers {
            config.sync.workers = workers;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = args.load_config()?;
    let mode = args.mode();

    info!(
        ?mode,
        data_dir = %config.storage.data_dir.display(),
        workers = config.sync.workers,
        "frontline-sync starting"
    );

    // The check mode only reads, everything else holds the directory
    let _lock = match mode {
        Mode::CheckSidc => None,
        _ => Some(ProcessLock::acquire(&config.storage.data_dir)?),
    };

    match mode {
        Mode::Generate | Mode::Update => {
            let orchestrator =
                Orchestrator::from_config(&config).context("Failed to set up remote source")?;
            let outcome = if mode == Mode::Generate {
                orchestrator.generate().await
            } else {
                orchestrator.update().await
            }
            .context("Synchronization failed")?;

            match outcome {
                SyncOutcome::UpToDate => info!("Nothing to update"),
                SyncOutcome::Synced(summary) => {
                    if !summary.failed.is_empty() {
                        let failed: Vec<String> =
                            summary.failed.iter().map(ToString::to_string).collect();
                        tracing::warn!(dates = %failed.join(","), "Some dates have no data");
                    }
                }
            }
        }
        // Classification modes never touch the remote or the day files
        Mode::CheckSidc => {
            let state = StateDir::new(config.storage.data_dir.clone());
            let stale = check_classification(&state, &SidcClassifier)
                .context("Classification check failed")?;
            info!(stale, "Classification check finished");
        }
        Mode::ForceSidc => {
            let state = StateDir::new(config.storage.data_dir.clone());
            force_classification(&state, &SidcClassifier)
                .context("Classification update failed")?;
        }
    }

    Ok(())
}
