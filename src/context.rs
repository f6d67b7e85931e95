// file: src/context.rs
// version: 1.2.0
// guid: d34d818d-897b-499c-83ae-35647baf3591

//! Execution context: typed, append-only service registry for one invocation

use crate::console::Console;
use crate::exec::CommandRunner;
use crate::identity::TokenCredential;
use crate::options::GlobalOptions;
use crate::output::{Formatter, OutputWriter};
use crate::tools::InstalledCheckCache;
use crate::workspace::Workspace;
use std::sync::Arc;

/// Ambient services for a single command invocation.
///
/// The context is an immutable overlay: every `with_*` call produces a child
/// context that sees the new registration plus everything the parent carried,
/// while the parent handle keeps observing exactly what it did before. There
/// is no in-place mutation and no removal; re-registering a kind just means
/// the child sees the most recent instance.
///
/// Lookups return `Option` so "never registered" stays observable instead of
/// being papered over with a default service.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    options: Option<Arc<GlobalOptions>>,
    workspace: Option<Arc<Workspace>>,
    credential: Option<Arc<dyn TokenCredential>>,
    runner: Option<Arc<CommandRunner>>,
    tool_cache: Option<InstalledCheckCache>,
    console: Option<Arc<dyn Console>>,
    writer: Option<OutputWriter>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(&self, options: GlobalOptions) -> Self {
        let mut child = self.clone();
        child.options = Some(Arc::new(options));
        child
    }

    pub fn options(&self) -> Option<Arc<GlobalOptions>> {
        self.options.clone()
    }

    pub fn with_workspace(&self, workspace: Workspace) -> Self {
        let mut child = self.clone();
        child.workspace = Some(Arc::new(workspace));
        child
    }

    pub fn workspace(&self) -> Option<Arc<Workspace>> {
        self.workspace.clone()
    }

    pub fn with_credential(&self, credential: Arc<dyn TokenCredential>) -> Self {
        let mut child = self.clone();
        child.credential = Some(credential);
        child
    }

    pub fn credential(&self) -> Option<Arc<dyn TokenCredential>> {
        self.credential.clone()
    }

    pub fn with_runner(&self, runner: CommandRunner) -> Self {
        let mut child = self.clone();
        child.runner = Some(Arc::new(runner));
        child
    }

    pub fn runner(&self) -> Option<Arc<CommandRunner>> {
        self.runner.clone()
    }

    pub fn with_tool_cache(&self, cache: InstalledCheckCache) -> Self {
        let mut child = self.clone();
        child.tool_cache = Some(cache);
        child
    }

    pub fn tool_cache(&self) -> Option<InstalledCheckCache> {
        self.tool_cache.clone()
    }

    pub fn with_console(&self, console: Arc<dyn Console>) -> Self {
        let mut child = self.clone();
        child.console = Some(console);
        child
    }

    pub fn console(&self) -> Option<Arc<dyn Console>> {
        self.console.clone()
    }

    pub fn with_writer(&self, writer: OutputWriter) -> Self {
        let mut child = self.clone();
        child.writer = Some(writer);
        child
    }

    pub fn writer(&self) -> Option<OutputWriter> {
        self.writer.clone()
    }

    pub fn with_formatter(&self, formatter: Arc<dyn Formatter>) -> Self {
        let mut child = self.clone();
        child.formatter = Some(formatter);
        child
    }

    pub fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        self.formatter.clone()
    }
}
