//! CLI module for reqai
//!
//! Provides command-line interface for:
//! - serve: run the HTTP entity API
//! - init: create an empty document
//! - export: one-shot RTF export

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, ConfigArgs};
pub use commands::{export, init, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse the process arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
