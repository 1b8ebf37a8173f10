// ABOUTME: The deploy-zdd command: argument parsing, hooks and orchestration.
// ABOUTME: Runs pre-deploy, then the rollout, then post-deploy or on-error hooks.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;

use crate::deploy::{DeploymentRequest, Orchestrator};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::hooks::{HookContext, HookPoint, HookRunner};
use crate::output::Output;
use crate::registry::{CommandContext, CommandMetadata, PluginCommand};

use super::parse_args;

pub const DEPLOY_COMMAND_NAME: &str = "deploy-zdd";

#[derive(Debug, Parser)]
#[command(name = DEPLOY_COMMAND_NAME)]
#[command(about = "Deploy a versioned application with zero downtime")]
pub struct DeployArgs {
    /// Versioned application label, e.g. myApp#1.2.3-abcde
    pub label: String,

    /// Deployment manifest
    #[arg(short = 'f', long = "manifest")]
    pub manifest: PathBuf,

    /// Application artifact to push
    #[arg(short = 'p', long = "path")]
    pub artifact: PathBuf,

    /// Scaleover window (e.g. 60s, 8m); gates deleting the old instance on health
    #[arg(value_parser = parse_window)]
    pub scaleover: Option<Duration>,
}

impl DeployArgs {
    /// Build the deployment request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Deploy` when the label is not a valid identity.
    pub fn request(&self) -> Result<DeploymentRequest> {
        let request = DeploymentRequest::parse(&self.label, &self.manifest, &self.artifact)?;
        Ok(match self.scaleover {
            Some(window) => request.with_scaleover(window),
            None => request,
        })
    }
}

fn parse_window(value: &str) -> std::result::Result<Duration, String> {
    let window = humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| format!("invalid scaleover window '{value}': {e}"))?;
    if window.is_zero() {
        return Err("scaleover window must be greater than zero".to_string());
    }
    Ok(window)
}

pub struct DeployCommand;

#[async_trait]
impl PluginCommand for DeployCommand {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: DEPLOY_COMMAND_NAME,
            help: "Zero-downtime deploy of a versioned application",
            usage: "deploy-zdd <name#version> -f <manifest> -p <artifact> [window]",
        }
    }

    async fn run(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<()> {
        let Some(args) = parse_args::<DeployArgs>(args)? else {
            return Ok(());
        };
        let request = args.request()?;
        deploy(&request, ctx).await
    }
}

/// Deploy one release, wrapping the rollout in project hooks.
///
/// # Errors
///
/// Returns `Error::Hook` when the pre-deploy hook fails (nothing is issued),
/// otherwise `Error::Deploy` for rollout failures.
pub async fn deploy(request: &DeploymentRequest, ctx: &mut CommandContext<'_>) -> Result<()> {
    ctx.output.start_timer();
    let hooks = HookRunner::new(ctx.project_dir);
    let mut diag = Diagnostics::default();
    let target = request.target();

    let mode = match request.scaleover() {
        Some(window) => format!("scaleover {}s", window.as_secs()),
        None => "big-bang".to_string(),
    };
    ctx.output.progress(&format!("Deploying {target} ({mode})"));

    let context = HookContext::new(target);
    run_hook(&hooks, HookPoint::PreDeploy, &context, ctx.output, &mut diag).await?;

    let orchestrator = Orchestrator::new(ctx.plane, ctx.config.rollout_settings());
    let report = match orchestrator.run(request, ctx.output, &mut diag).await {
        Ok(report) => report,
        Err(e) => {
            let context = context.with_error(&e);
            run_hook(&hooks, HookPoint::OnError, &context, ctx.output, &mut diag).await?;
            if e.may_have_mutated() {
                diag.warn(Warning::partial_rollout(format!(
                    "completed steps for {target} were not rolled back"
                )));
            }
            diag.report(ctx.output);
            return Err(e.into());
        }
    };

    let context = context
        .with_plan(report.plan)
        .with_previous(report.retired.clone());
    run_hook(&hooks, HookPoint::PostDeploy, &context, ctx.output, &mut diag).await?;

    diag.report(ctx.output);
    ctx.output.record("report", &report);
    ctx.output
        .success(&format!("Deployed {} ({})", report.app, report.plan));
    Ok(())
}

/// Run one hook. A failing fatal hook is an error; others become warnings.
async fn run_hook(
    hooks: &HookRunner,
    point: HookPoint,
    context: &HookContext,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    let Some(result) = hooks.run(point, context).await else {
        return Ok(());
    };
    if result.success {
        return Ok(());
    }
    if point.is_fatal() {
        if !result.stderr.trim().is_empty() {
            output.error(result.stderr.trim_end());
        }
        return Err(Error::Hook(point.filename().to_string()));
    }
    diag.warn(Warning::hook(result.summary()));
    Ok(())
}
