//! RoleScope - Main Binary
//!
//! Offline role and privilege audit:
//! - Loads the five relation tables from CSV
//! - Resolves role hierarchies per identity in parallel
//! - Reports toxic-privilege and separation-of-duties violations

use anyhow::{Context, Result};
use clap::Parser;
use rolescope_engine::EvaluationPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod config;
mod loader;
mod writer;

use config::{AuditConfig, OutputFormat};

/// RoleScope CLI
#[derive(Parser)]
#[command(name = "rolescope")]
#[command(about = "RoleScope - offline role-hierarchy and separation-of-duties audit")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "ROLESCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Identity-to-role assignment table
    #[arg(long)]
    assignments: Option<PathBuf>,

    /// Role-to-privilege grant table
    #[arg(long)]
    grants: Option<PathBuf>,

    /// Separation-of-duties policy table
    #[arg(long)]
    sod: Option<PathBuf>,

    /// Toxic privilege table
    #[arg(long)]
    toxic: Option<PathBuf>,

    /// Role hierarchy table
    #[arg(long)]
    hierarchy: Option<PathBuf>,

    /// Report destination
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Worker threads for evaluation (0 = one per core)
    #[arg(long, env = "ROLESCOPE_THREADS")]
    threads: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(true)
        .init();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            let config = AuditConfig::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => AuditConfig::default(),
    };

    // Apply CLI overrides
    if let Some(path) = cli.assignments {
        config.inputs.assignments = path;
    }
    if let Some(path) = cli.grants {
        config.inputs.grants = path;
    }
    if let Some(path) = cli.sod {
        config.inputs.sod = path;
    }
    if let Some(path) = cli.toxic {
        config.inputs.toxic = path;
    }
    if let Some(path) = cli.hierarchy {
        config.inputs.hierarchy = path;
    }
    if let Some(path) = cli.output {
        config.output.path = path;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(threads) = cli.threads {
        config.runtime.threads = threads;
    }

    config.validate()?;

    if config.runtime.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.runtime.threads)
            .build_global()
            .context("Failed to configure worker pool")?;
    }

    let store = loader::load_store(&config.inputs)?;
    let summary = store.summary();
    info!(
        roles = summary.roles,
        identities = summary.identities,
        hierarchy_edges = summary.hierarchy_edges,
        toxic_privileges = summary.toxic_privileges,
        sod_pairs = summary.sod_pairs,
        "relation tables loaded"
    );

    let pipeline = EvaluationPipeline::new(Arc::new(store));
    let records = pipeline.evaluate_all();

    writer::write_report(&config.output.path, config.output.format, &records)?;
    info!(
        violations = records.len(),
        output = %config.output.path.display(),
        "analysis complete"
    );

    Ok(())
}
