//! Command dispatch and handler modules.

mod hierarchy;
mod realize;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the matching command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Realize {
            metadata,
            config,
            json,
        } => realize::exec(&metadata, config.as_deref(), json),
        Command::Hierarchy {
            metadata,
            configuration,
            check,
        } => hierarchy::exec(&metadata, configuration.as_deref(), check),
    }
}
