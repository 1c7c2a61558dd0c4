//! CLI argument definitions for realm.
//!
//! Uses `clap` derive macros; each command has a handler in
//! [`super::commands`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "realm",
    version,
    about = "Realize component variant metadata",
    long_about = "realm applies ordered metadata rules to the variants of a component, \
                  normalizes their dependencies and constraints, and computes \
                  configuration inheritance closures."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply rules to every variant of a component and print the result
    Realize {
        /// Component metadata document
        metadata: PathBuf,
        /// Rule configuration (defaults to Realm.toml next to the metadata)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print realized variants as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print configuration inheritance closures
    Hierarchy {
        /// Component metadata document
        metadata: PathBuf,
        /// Only print the closure of this configuration
        #[arg(long)]
        configuration: Option<String>,
        /// Report cycles and undeclared parents instead of printing closures
        #[arg(long)]
        check: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
