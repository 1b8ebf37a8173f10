// ABOUTME: Built-in plugin commands and their registration.
// ABOUTME: Each command parses its own argument list with clap.

mod deploy;
mod status;

pub use deploy::{DEPLOY_COMMAND_NAME, DeployArgs, DeployCommand, deploy};
pub use status::{STATUS_COMMAND_NAME, StatusArgs, StatusCommand, StatusRow};

use clap::Parser;
use clap::error::ErrorKind;

use crate::error::Result;
use crate::registry::CommandRegistry;

/// Register every built-in command.
///
/// # Errors
///
/// Returns `Error::DuplicateCommand` if a name is already taken.
pub fn register_builtin(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(DeployCommand)?;
    registry.register(StatusCommand)?;
    Ok(())
}

/// Parse a command's arguments. Help and version requests are printed and
/// yield `None`.
fn parse_args<T: Parser>(args: &[String]) -> Result<Option<T>> {
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
