// file: src/commands/version.rs
// version: 1.0.0
// guid: c3b15ebb-dc95-4603-9839-41a10ce24613

//! `sky version`

use crate::commands::{build, Action, BuildOptions, BuiltCommand};
use crate::context::ExecutionContext;
use crate::error::{Result, SkyError};
use crate::output::output_arg;
use crate::workspace::Workspace;
use async_trait::async_trait;
use clap::{Arg, ArgMatches};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

pub fn create() -> BuiltCommand {
    build(
        Arc::new(VersionAction),
        "version",
        "Print the version number of sky.",
        BuildOptions {
            // Version checks run constantly from scripts; they carry no
            // usage signal worth a span.
            disable_cmd_usage_event: true,
            ..Default::default()
        },
    )
}

struct VersionAction;

#[async_trait]
impl Action for VersionAction {
    fn setup_flags(&self, _persistent: &mut Vec<Arg>, local: &mut Vec<Arg>) {
        local.push(output_arg());
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        _matches: &ArgMatches,
        _workspace: &Workspace,
    ) -> Result<()> {
        let mut writer = ctx
            .writer()
            .ok_or_else(|| SkyError::execution("execution context missing a writer"))?;

        match ctx.formatter() {
            Some(formatter) => {
                let value = json!({ "version": crate::VERSION });
                formatter.format(&value, &mut writer)?;
            }
            None => writeln!(writer, "sky version {}", crate::VERSION)?,
        }
        writer.flush()?;
        Ok(())
    }
}
