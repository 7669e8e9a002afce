//! Command-line surface. A single entry point starts the TUI; there are no subcommands.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "haven", version, about = "A terminal SSH connection manager with a built-in VT emulator.")]
pub struct CliArgs {
    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Force SSH session transcript logging on for this run.
    #[arg(short = 'L', long = "ssh-log")]
    pub ssh_logging: bool,

    /// Override the configuration/database directory (development mode).
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

pub fn main_args() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }
}
