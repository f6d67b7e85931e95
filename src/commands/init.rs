// file: src/commands/init.rs
// version: 1.0.0
// guid: ae95bfdd-3446-4e89-8912-d57d66868d40

//! `sky init`

use crate::commands::{build, Action, BuildOptions, BuiltCommand};
use crate::context::ExecutionContext;
use crate::error::{Result, SkyError};
use crate::workspace::{ProjectConfig, Workspace, PROJECT_FILE};
use async_trait::async_trait;
use clap::ArgMatches;
use std::sync::Arc;

pub fn create() -> BuiltCommand {
    build(
        Arc::new(InitAction),
        "init",
        "Initialize a new Skyforge project in the current directory.",
        BuildOptions {
            long_help: Some(
                "Initialize a new Skyforge project by writing a skyforge.toml \
                 project file. The project name is prompted for, defaulting to \
                 the directory name; an existing file is only replaced after \
                 confirmation."
                    .to_string(),
            ),
            ..Default::default()
        },
    )
}

struct InitAction;

#[async_trait]
impl Action for InitAction {
    async fn run(
        &self,
        ctx: &ExecutionContext,
        _matches: &ArgMatches,
        workspace: &Workspace,
    ) -> Result<()> {
        let console = ctx
            .console()
            .ok_or_else(|| SkyError::execution("execution context missing a console"))?;

        let target = workspace.invoked_from().join(PROJECT_FILE);
        if target.is_file() {
            let replace = console.confirm(
                &format!("{} already exists. Replace it?", PROJECT_FILE),
                false,
            )?;
            if !replace {
                console.message("Keeping the existing project file.");
                return Ok(());
            }
        }

        let default_name = workspace
            .invoked_from()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        let name = console.prompt("Project name", Some(&default_name))?;

        let config = ProjectConfig {
            name,
            default_environment: None,
        };
        let raw = toml::to_string_pretty(&config)
            .map_err(|e| SkyError::config(format!("cannot serialize project file: {}", e)))?;
        std::fs::write(&target, raw)?;

        console.message(&format!("Created {}", target.display()));
        Ok(())
    }
}
