//! CLI argument definitions using clap
//!
//! Commands:
//! - reqai serve  [--config <path>] [--host <host>] [--port <port>] [--data-file <path>]
//! - reqai init   [--config <path>] [--data-file <path>]
//! - reqai export [--config <path>] [--data-file <path>] [--output <dir>] [--name <base>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// reqai - requirements entity store with RTF export
#[derive(Parser, Debug)]
#[command(name = "reqai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backing JSON document (overrides the configuration file)
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the entity API
    Serve {
        #[command(flatten)]
        common: ConfigArgs,

        /// Host to bind to (overrides the configuration file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the configuration file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create an empty document if none exists
    Init {
        #[command(flatten)]
        common: ConfigArgs,
    },

    /// Render the document to an RTF file and exit
    Export {
        #[command(flatten)]
        common: ConfigArgs,

        /// Directory the export is written to
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Base of the generated file name
        #[arg(long)]
        name: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
