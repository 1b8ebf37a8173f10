// ABOUTME: Entry point for the zdd CLI application.
// ABOUTME: Builds the command registry and dispatches to the named command.

mod cli;

use clap::Parser;
use cli::Cli;
use std::env;
use tracing_subscriber::EnvFilter;
use zdd::commands::register_builtin;
use zdd::config::Config;
use zdd::error::Result;
use zdd::output::Output;
use zdd::registry::{CommandContext, CommandRegistry};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let mut registry = CommandRegistry::new();
    register_builtin(&mut registry)?;

    if cli.args.is_empty() {
        println!("Available commands:");
        for command in registry.metadata() {
            println!("  {:<12} {}", command.name, command.help);
            println!("  {:<12} usage: {}", "", command.usage);
        }
        return Ok(());
    }

    let cwd = env::current_dir()?;
    let config = Config::resolve(&cwd, cli.config.as_deref())?;
    let plane = config.cf.client();

    let mut ctx = CommandContext {
        plane: &plane,
        config: &config,
        output,
        project_dir: &cwd,
    };
    registry.dispatch(&cli.args, &mut ctx).await
}
