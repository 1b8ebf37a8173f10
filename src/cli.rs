// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Global flags, then a plugin command name and its raw arguments.

use clap::Parser;
use std::path::PathBuf;
use zdd::output::OutputMode;

#[derive(Parser)]
#[command(name = "zdd")]
#[command(about = "Zero-downtime application deployment for Cloud Foundry")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines for scripting
    #[arg(long)]
    pub json: bool,

    /// Configuration file (defaults to zdd.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.quiet, self.json)
    }
}
