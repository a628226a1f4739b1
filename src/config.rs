//! Configuration for the h5-bridge server.
//!
//! Command-line arguments via clap, with `H5_BRIDGE_` environment-variable
//! fallbacks. The served directory is validated up front so a misconfigured
//! launch fails before the protocol handshake.
//!
//! # Environment Variables
//!
//! - `H5_BRIDGE_DIRECTORY` - Root directory to scan for HDF5 files
//! - `H5_BRIDGE_VERBOSE` - Enable debug-level logging

use std::fs;
use std::path::PathBuf;

use clap::Parser;

/// h5-bridge - An MCP server for HDF5 files.
///
/// Scans a directory for HDF5 files and serves them over the Model Context
/// Protocol on stdio: each file becomes a resource addressed by an h5:// URI,
/// and datasets are read through a safe NumPy-style slicing tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "h5-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Root directory to scan recursively for HDF5 files.
    #[arg(long, env = "H5_BRIDGE_DIRECTORY")]
    pub directory: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false, env = "H5_BRIDGE_VERBOSE")]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "directory '{}' does not exist",
                self.directory.display()
            ));
        }
        if !self.directory.is_dir() {
            return Err(format!(
                "'{}' is not a directory",
                self.directory.display()
            ));
        }
        if fs::read_dir(&self.directory).is_err() {
            return Err(format!(
                "directory '{}' is not readable",
                self.directory.display()
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
