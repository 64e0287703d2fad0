//! Command line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lockbox")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Encrypted credential store with snapshot and restore")]
pub struct Cli {
    /// Settings file (defaults to `lockbox.{toml,json,yaml}` in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Walk through snapshot, mutation and restore on an in-memory store
    Demo {},
    /// Encrypt and store a password for a category
    Set {
        category: String,
        /// Password to store; a generated one is used when omitted
        value: Option<String>,
    },
    /// Decrypt and print the password stored for a category
    Get { category: String },
    /// Generate a password without storing it
    Generate {
        /// Override the configured length
        #[arg(short, long)]
        length: Option<u32>,
        /// Override the configured generator (`alphanumeric` or `special`)
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Print the effective configuration with the key redacted
    ShowConfig {},
}
