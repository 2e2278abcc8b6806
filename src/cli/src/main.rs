//! Posture report CLI
//!
//! Scope coverage, per-asset scope explanations, filtered asset listings
//! and scan statistics over exported inventory snapshots.

use anyhow::Result;
use clap::{Parser, Subcommand};
use posture_cli::inputs::{load_assets, load_scans, load_scope};
use posture_cli::{
    render, AssetListing, AssetQuery, CoverageReport, ExplainReport, OutputFormat, ReportConfig,
    ScanReport,
};
use posture_core::{AssetStatus, AssetType, ScanStatus};
use std::path::PathBuf;
use tracing::{debug, info};

/// Posture report CLI
#[derive(Parser)]
#[command(name = "posture-report")]
#[command(about = "Scope coverage and inventory reports")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "POSTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Asset snapshot (overrides config)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Scope directory (overrides config)
    #[arg(long, global = true)]
    scope_dir: Option<PathBuf>,

    /// Scan snapshot (overrides config)
    #[arg(long, global = true)]
    scans: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scope coverage for a tenant
    Coverage {
        #[arg(long, env = "POSTURE_TENANT")]
        tenant: String,

        /// Break coverage down by asset type
        #[arg(long)]
        by_kind: bool,
    },

    /// Explain why an asset is or is not in scope
    Explain {
        #[arg(long, env = "POSTURE_TENANT")]
        tenant: String,

        /// Asset id
        #[arg(long)]
        asset: String,
    },

    /// List assets with their scope badge
    Assets {
        #[arg(long, env = "POSTURE_TENANT")]
        tenant: String,

        #[arg(long)]
        status: Option<AssetStatus>,

        #[arg(long = "type", value_parser = parse_asset_type)]
        asset_type: Option<AssetType>,

        /// Case-insensitive search over name and id
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (overrides config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Scan statistics
    Scans {
        #[arg(long)]
        status: Option<ScanStatus>,
    },
}

fn parse_asset_type(s: &str) -> std::result::Result<AssetType, String> {
    match AssetType::parse_lenient(s) {
        AssetType::Other if !s.trim().eq_ignore_ascii_case("other") => {
            Err(format!("unknown asset type '{}'", s))
        }
        asset_type => Ok(asset_type),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; relative inputs resolve against the config file
    let mut config = ReportConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(assets) = cli.assets {
        config.inputs.assets = assets;
    }
    if let Some(scope_dir) = cli.scope_dir {
        config.inputs.scope_dir = scope_dir;
    }
    if let Some(scans) = cli.scans {
        config.inputs.scans = scans;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Command::Assets { page_size: Some(page_size), .. } = &cli.command {
        config.output.page_size = *page_size;
    }

    // Validate configuration
    config.validate()?;

    // Initialize logging; reports go to stdout, logs to stderr
    let log_level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("posture-report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Configuration: {:?}", config);

    let format = config.output.format;
    let output = match cli.command {
        Command::Coverage { tenant, by_kind } => {
            let assets = load_assets(&config.inputs.assets)?;
            let scope = load_scope(&config.inputs.scope_dir, &tenant).await?;
            render(&CoverageReport::build(&tenant, &assets, &scope, by_kind), format)?
        }
        Command::Explain { tenant, asset } => {
            let assets = load_assets(&config.inputs.assets)?;
            let scope = load_scope(&config.inputs.scope_dir, &tenant).await?;
            render(&ExplainReport::build(&asset, &assets, &scope)?, format)?
        }
        Command::Assets {
            tenant,
            status,
            asset_type,
            search,
            page,
            ..
        } => {
            let assets = load_assets(&config.inputs.assets)?;
            let scope = load_scope(&config.inputs.scope_dir, &tenant).await?;
            let query = AssetQuery {
                status,
                asset_type,
                search,
                page,
                page_size: config.output.page_size,
            };
            render(&AssetListing::build(&assets, &scope, &query)?, format)?
        }
        Command::Scans { status } => {
            let scans = load_scans(&config.inputs.scans)?;
            render(&ScanReport::build(&scans, status)?, format)?
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
