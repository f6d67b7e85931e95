// file: src/commands/doctor.rs
// version: 1.0.0
// guid: f8039008-4fb1-43a2-8655-eb1244e0f582

//! `sky doctor`

use crate::commands::{build, Action, BuildOptions, BuiltCommand};
use crate::context::ExecutionContext;
use crate::error::{Result, SkyError};
use crate::exec::RunArgs;
use crate::output::output_arg;
use crate::workspace::Workspace;
use async_trait::async_trait;
use clap::{Arg, ArgMatches};
use colored::Colorize;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

/// Tools every Skyforge project relies on, with install hints for the ones
/// that are missing.
const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("git", "https://git-scm.com/downloads"),
    ("docker", "https://docs.docker.com/get-docker/"),
    ("skyctl", "https://skyforge.example/docs/install"),
];

pub fn create() -> BuiltCommand {
    build(
        Arc::new(DoctorAction),
        "doctor",
        "Check that the tools sky depends on are installed.",
        BuildOptions::default(),
    )
}

struct ToolReport {
    name: &'static str,
    hint: &'static str,
    installed: bool,
    version: Option<String>,
}

struct DoctorAction;

impl DoctorAction {
    async fn probe(&self, ctx: &ExecutionContext) -> Result<Vec<ToolReport>> {
        let cache = ctx
            .tool_cache()
            .ok_or_else(|| SkyError::execution("execution context missing the tool cache"))?;
        let runner = ctx
            .runner()
            .ok_or_else(|| SkyError::execution("execution context missing a runner"))?;

        let mut reports = Vec::with_capacity(REQUIRED_TOOLS.len());
        for (name, hint) in REQUIRED_TOOLS {
            let installed = cache.check_installed(name);
            let version = if installed {
                runner
                    .run(RunArgs::new(*name).args(["--version"]))
                    .await
                    .ok()
                    .and_then(|result| {
                        result.stdout.lines().next().map(|line| line.trim().to_string())
                    })
            } else {
                None
            };
            reports.push(ToolReport {
                name,
                hint,
                installed,
                version,
            });
        }
        Ok(reports)
    }
}

#[async_trait]
impl Action for DoctorAction {
    fn setup_flags(&self, _persistent: &mut Vec<Arg>, local: &mut Vec<Arg>) {
        local.push(output_arg());
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        _matches: &ArgMatches,
        _workspace: &Workspace,
    ) -> Result<()> {
        let console = ctx
            .console()
            .ok_or_else(|| SkyError::execution("execution context missing a console"))?;
        let mut writer = ctx
            .writer()
            .ok_or_else(|| SkyError::execution("execution context missing a writer"))?;

        let spinner = console.spinner("Probing required tools");
        let reports = self.probe(ctx).await?;
        spinner.finish_and_clear();

        match ctx.formatter() {
            Some(formatter) => {
                let value = json!(reports
                    .iter()
                    .map(|r| {
                        json!({
                            "tool": r.name,
                            "installed": r.installed,
                            "version": r.version,
                        })
                    })
                    .collect::<Vec<_>>());
                formatter.format(&value, &mut writer)?;
            }
            None => {
                for report in &reports {
                    let line = if report.installed {
                        format!(
                            "{} {} {}",
                            "✓".green(),
                            report.name,
                            report.version.as_deref().unwrap_or("")
                        )
                    } else {
                        format!(
                            "{} {} not found ({})",
                            "✗".red(),
                            report.name,
                            report.hint
                        )
                    };
                    writeln!(writer, "{}", line.trim_end())?;
                }
            }
        }
        writer.flush()?;

        let missing: Vec<&str> = reports
            .iter()
            .filter(|r| !r.installed)
            .map(|r| r.name)
            .collect();
        if !missing.is_empty() {
            return Err(SkyError::validation(format!(
                "missing required tools: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
