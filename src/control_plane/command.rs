// ABOUTME: Argument shapes for the control plane commands zdd issues.
// ABOUTME: Argument order is a compatibility contract with the cf CLI surface.

use std::path::Path;

/// A control plane command and its arguments.
#[derive(Debug, Clone, Copy)]
pub enum CfCommand<'a> {
    /// `push <app> -f <manifest> -p <artifact>`
    Push {
        app: &'a str,
        manifest: &'a Path,
        artifact: &'a Path,
    },
    /// `rename <old> <new>`
    Rename { from: &'a str, to: &'a str },
    /// `delete <app> [-f]`
    Delete { app: &'a str, force: bool },
    /// `app <app>`, the status query.
    Status { app: &'a str },
    /// `apps`, the inventory listing.
    Apps,
}

impl CfCommand<'_> {
    pub fn args(&self) -> Vec<String> {
        match *self {
            CfCommand::Push {
                app,
                manifest,
                artifact,
            } => vec![
                "push".to_string(),
                app.to_string(),
                "-f".to_string(),
                manifest.display().to_string(),
                "-p".to_string(),
                artifact.display().to_string(),
            ],
            CfCommand::Rename { from, to } => {
                vec!["rename".to_string(), from.to_string(), to.to_string()]
            }
            CfCommand::Delete { app, force } => {
                let mut args = vec!["delete".to_string(), app.to_string()];
                if force {
                    args.push("-f".to_string());
                }
                args
            }
            CfCommand::Status { app } => vec!["app".to_string(), app.to_string()],
            CfCommand::Apps => vec!["apps".to_string()],
        }
    }
}
