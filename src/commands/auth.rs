// file: src/commands/auth.rs
// version: 1.0.0
// guid: c9790fbc-917d-4b12-9e30-c602c5e92243

//! `sky auth` command group

use crate::commands::{build, Action, BuildOptions, BuiltCommand};
use crate::context::ExecutionContext;
use crate::error::{Result, SkyError};
use crate::output::output_arg;
use crate::workspace::Workspace;
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

pub fn create() -> BuiltCommand {
    BuiltCommand::group(
        "auth",
        "Authenticate with the Skyforge platform.",
        vec![build(
            Arc::new(TokenAction),
            "token",
            "Acquire an access token for the platform APIs.",
            BuildOptions::default(),
        )],
    )
}

struct TokenAction;

#[async_trait]
impl Action for TokenAction {
    fn setup_flags(&self, _persistent: &mut Vec<Arg>, local: &mut Vec<Arg>) {
        local.push(
            Arg::new("scope")
                .long("scope")
                .value_name("SCOPE")
                .action(ArgAction::Append)
                .help("Scope to request; repeat the flag for multiple scopes"),
        );
        local.push(output_arg());
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        matches: &ArgMatches,
        _workspace: &Workspace,
    ) -> Result<()> {
        let credential = ctx
            .credential()
            .ok_or_else(|| SkyError::execution("execution context missing a credential"))?;
        let mut writer = ctx
            .writer()
            .ok_or_else(|| SkyError::execution("execution context missing a writer"))?;

        let scopes: Vec<String> = matches
            .get_many::<String>("scope")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let token = credential.get_token(&scopes).await?;

        match ctx.formatter() {
            Some(formatter) => {
                let value = json!({
                    "token": token.token,
                    "expiresOn": token.expires_on,
                });
                formatter.format(&value, &mut writer)?;
            }
            None => writeln!(writer, "{}", token.token)?,
        }
        writer.flush()?;
        Ok(())
    }
}
