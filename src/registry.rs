// ABOUTME: Explicit registry of named plugin commands.
// ABOUTME: Built at startup and passed to the dispatcher; there is no global registry.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::config::Config;
use crate::control_plane::ControlPlane;
use crate::error::{Error, Result};
use crate::output::Output;

/// Name and help text a command advertises to the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMetadata {
    pub name: &'static str,
    pub help: &'static str,
    pub usage: &'static str,
}

/// Everything a command needs from the host process.
pub struct CommandContext<'a> {
    pub plane: &'a dyn ControlPlane,
    pub config: &'a Config,
    pub output: &'a mut Output,
    pub project_dir: &'a Path,
}

/// A command that can be registered and dispatched by name.
#[async_trait]
pub trait PluginCommand: Send + Sync {
    fn metadata(&self) -> CommandMetadata;

    /// Run with the full argument list; `args[0]` is the command name.
    async fn run(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<()>;
}

/// Commands known to this process, keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn PluginCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateCommand` if the name is taken.
    pub fn register(&mut self, command: impl PluginCommand + 'static) -> Result<()> {
        let name = command.metadata().name;
        if self.commands.contains_key(name) {
            return Err(Error::DuplicateCommand(name.to_string()));
        }
        tracing::debug!(command = name, "registered command");
        self.commands.insert(name, Box::new(command));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn PluginCommand> {
        self.commands.get(name).map(|command| command.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Metadata of every registered command, sorted by name.
    pub fn metadata(&self) -> Vec<CommandMetadata> {
        self.commands.values().map(|c| c.metadata()).collect()
    }

    /// Look up `args[0]` and run it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCommand` for unregistered names, otherwise
    /// whatever the command returns.
    pub async fn dispatch(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
        let name = args
            .first()
            .ok_or_else(|| Error::UnknownCommand(String::new()))?;
        let command = self
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.clone()))?;
        command.run(args, ctx).await
    }
}
