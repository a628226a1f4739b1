//! h5-bridge - An MCP server for HDF5 files.
//!
//! This binary scans the configured directory and serves the MCP protocol on
//! stdio. Logging goes to stderr; stdout belongs to the protocol.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use h5_bridge::{scan_for_files, Config, H5BridgeService, Hdf5Store};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = Hdf5Store::new();

    info!("Scanning for HDF5 files in: {}", config.directory.display());
    let files = match scan_for_files(&store, &config.directory) {
        Ok(files) => files,
        Err(e) => {
            error!("Scan failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Found {} HDF5 file(s)", files.len());

    info!("Starting MCP server on stdio");
    let service = H5BridgeService::new(store, files);
    if let Err(e) = service.serve_stdio().await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
///
/// Output is written to stderr: stdout carries MCP protocol frames and must
/// stay clean.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "h5_bridge=debug"
    } else {
        "h5_bridge=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
