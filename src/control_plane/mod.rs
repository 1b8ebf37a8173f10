// ABOUTME: Control plane access: the command-execution trait and the cf CLI backend.
// ABOUTME: Re-exports command shapes, app summaries and command errors.

mod apps;
mod cf;
mod command;
mod error;
mod plane;

pub use apps::{AppSummary, parse_apps_table};
pub(crate) use apps::parse_instances;
pub use cf::{CfCli, DEFAULT_CF_BINARY};
pub use command::CfCommand;
pub use error::{CommandError, CommandErrorKind};
pub use plane::ControlPlane;
