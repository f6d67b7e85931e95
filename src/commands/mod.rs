// file: src/commands/mod.rs
// version: 1.2.0
// guid: 5a349e0a-7262-4757-a8c8-c79435444267

//! Command construction for the Skyforge CLI
//!
//! Commands are declared as an [`Action`] plus a usage line and help text;
//! the builder turns that into an invocable command with assembled services
//! and usage telemetry.

pub mod auth;
pub mod builder;
pub mod doctor;
pub mod init;
pub mod version;

pub use builder::{assemble_context, build, BuildOptions, BuiltCommand, CliApp, Invocation};

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::workspace::Workspace;
use async_trait::async_trait;
use clap::{Arg, ArgMatches};

/// The `sky` CLI with its shipped commands.
pub fn default_app() -> CliApp {
    CliApp::new(
        "sky",
        crate::VERSION,
        "Developer CLI for the Skyforge platform.",
        vec![
            auth::create(),
            doctor::create(),
            init::create(),
            version::create(),
        ],
    )
}

/// The work behind a command, decoupled from flag grammar and wiring.
///
/// One implementing type per concrete command; the builder drives every
/// action through dynamic dispatch and never looks inside.
#[async_trait]
pub trait Action: Send + Sync {
    /// Declare the command's flags. Persistent flags propagate to the
    /// command's whole subtree, local flags bind to the command itself.
    fn setup_flags(&self, persistent: &mut Vec<Arg>, local: &mut Vec<Arg>) {
        let _ = (persistent, local);
    }

    /// Run against a fully assembled execution context.
    async fn run(
        &self,
        ctx: &ExecutionContext,
        matches: &ArgMatches,
        workspace: &Workspace,
    ) -> Result<()>;
}
