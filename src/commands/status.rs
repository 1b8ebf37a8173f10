// ABOUTME: The zdd-status command: lists deployed versions of an application.
// ABOUTME: Read-only; issues a single listing query.

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;

use crate::deploy::{InstanceRecord, list_instances};
use crate::error::Result;
use crate::output::OutputMode;
use crate::registry::{CommandContext, CommandMetadata, PluginCommand};

use super::parse_args;

pub const STATUS_COMMAND_NAME: &str = "zdd-status";

#[derive(Debug, Parser)]
#[command(name = STATUS_COMMAND_NAME)]
#[command(about = "Show deployed versions of an application")]
pub struct StatusArgs {
    /// Application base name (the part before '#')
    pub base_name: String,
}

/// One deployed instance as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub app: String,
    pub version: String,
    pub state: &'static str,
    pub running: u32,
    pub total: u32,
}

impl From<&InstanceRecord> for StatusRow {
    fn from(record: &InstanceRecord) -> Self {
        Self {
            app: record.identity.label().to_string(),
            version: record.identity.version().to_string(),
            state: record.state.as_str(),
            running: record.running_count,
            total: record.instance_count,
        }
    }
}

pub struct StatusCommand;

#[async_trait]
impl PluginCommand for StatusCommand {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: STATUS_COMMAND_NAME,
            help: "List deployed versions of an application",
            usage: "zdd-status <base-name>",
        }
    }

    async fn run(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(args) = parse_args::<StatusArgs>(args)? else {
            return Ok(());
        };

        let records = list_instances(ctx.plane, &args.base_name).await?;
        let rows: Vec<StatusRow> = records.iter().map(StatusRow::from).collect();

        if ctx.output.mode() == OutputMode::Json {
            ctx.output.record("instances", &rows);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No deployed versions of {}", args.base_name);
            return Ok(());
        }
        for row in &rows {
            println!(
                "{:<40} {:<8} {}/{}",
                row.app, row.state, row.running, row.total
            );
        }
        Ok(())
    }
}
