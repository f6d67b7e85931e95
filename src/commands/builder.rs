// file: src/commands/builder.rs
// version: 1.0.0
// guid: 7938a189-6745-41e2-9865-f9693274e29c

//! Command builder: turns an [`Action`] into an invocable command
//!
//! Building wires up the clap command spec; invoking assembles the execution
//! context, optionally brackets the action in a usage telemetry span, and
//! returns the action's result untouched.

use crate::commands::Action;
use crate::console::{self, ConsoleHandles, TerminalConsole};
use crate::context::ExecutionContext;
use crate::error::{Result, SkyError};
use crate::exec::CommandRunner;
use crate::identity::SkyctlCredential;
use crate::options::{global_args, GlobalOptions};
use crate::output::{self, select_writer};
use crate::telemetry::{command_event_name, Tracer, TracingTracer, UNKNOWN_ERROR};
use crate::tools::InstalledCheckCache;
use crate::workspace::Workspace;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::Instrument;

/// Build-time options for one command.
#[derive(Default)]
pub struct BuildOptions {
    /// Alternative names the command answers to.
    pub aliases: Vec<String>,
    /// Long help shown by `--help`; falls back to the short help.
    pub long_help: Option<String>,
    /// Skip the usage telemetry span for this command.
    pub disable_cmd_usage_event: bool,
}

/// Everything one invocation brings along before assembly: the bound root
/// options, the three I/O streams, the telemetry backend and a seed context
/// for pre-registered services.
pub struct Invocation {
    pub options: GlobalOptions,
    pub handles: ConsoleHandles,
    pub tracer: Arc<dyn Tracer>,
    /// Services registered here survive assembly; the credential assembler
    /// skips construction when the seed already carries a credential.
    pub seed: ExecutionContext,
}

impl Invocation {
    /// The production shape: process streams and the `tracing`-backed tracer.
    pub fn from_process(options: GlobalOptions) -> Self {
        Self {
            options,
            handles: ConsoleHandles::from_process(),
            tracer: Arc::new(TracingTracer),
            seed: ExecutionContext::new(),
        }
    }
}

/// Build an invocable command from an action.
///
/// The use line's first word names the command. A `-h/--help` flag is always
/// declared; every other flag comes from the action itself.
pub fn build(
    action: Arc<dyn Action>,
    use_line: &str,
    short: &str,
    options: BuildOptions,
) -> BuiltCommand {
    let name = use_name(use_line);
    let mut spec = base_spec(&name, short, &options);

    let mut persistent = Vec::new();
    let mut local = Vec::new();
    action.setup_flags(&mut persistent, &mut local);
    for arg in persistent {
        spec = spec.arg(arg.global(true));
    }
    for arg in local {
        spec = spec.arg(arg);
    }

    BuiltCommand {
        name,
        spec,
        action: Some(action),
        children: Vec::new(),
        disable_cmd_usage_event: options.disable_cmd_usage_event,
    }
}

fn use_name(use_line: &str) -> String {
    use_line.split_whitespace().next().unwrap_or(use_line).to_string()
}

fn base_spec(name: &str, short: &str, options: &BuildOptions) -> Command {
    let mut spec = Command::new(name.to_string())
        .about(short.to_string())
        .long_about(options.long_help.clone().unwrap_or_else(|| short.to_string()))
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .help(format!("Gets help for {}.", name))
                .action(ArgAction::Help),
        );
    if !options.aliases.is_empty() {
        spec = spec.visible_aliases(options.aliases.clone());
    }
    spec
}

/// A command produced by [`build`], or a group dispatching to child commands.
pub struct BuiltCommand {
    name: String,
    spec: Command,
    action: Option<Arc<dyn Action>>,
    children: Vec<BuiltCommand>,
    disable_cmd_usage_event: bool,
}

impl BuiltCommand {
    /// A parent command with no action of its own; invocation dispatches to
    /// the matched child, extending the command path.
    pub fn group(use_line: &str, short: &str, children: Vec<BuiltCommand>) -> Self {
        let name = use_name(use_line);
        let mut spec = base_spec(&name, short, &BuildOptions::default())
            .subcommand_required(true)
            .arg_required_else_help(true);
        for child in &children {
            spec = spec.subcommand(child.spec.clone());
        }
        Self {
            name,
            spec,
            action: None,
            children,
            disable_cmd_usage_event: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &Command {
        &self.spec
    }

    /// Run the command. `parent_path` is the chain of declared command names
    /// leading here, starting with the binary's own name.
    ///
    /// Boxed so group dispatch can recurse into child commands.
    pub fn invoke<'a>(
        &'a self,
        parent_path: &'a str,
        matches: &'a ArgMatches,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let path = format!("{} {}", parent_path, self.name);

            let action = match &self.action {
                Some(action) => action,
                None => {
                    let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
                        SkyError::invalid_argument(format!("'{}' requires a subcommand", path))
                    })?;
                    let child = self
                        .children
                        .iter()
                        .find(|c| c.name == name)
                        .ok_or_else(|| {
                            SkyError::invalid_argument(format!(
                                "unknown command '{} {}'",
                                path, name
                            ))
                        })?;
                    return child.invoke(&path, sub_matches, invocation).await;
                }
            };

            // Assembly failures abort before the action ever runs.
            let ctx = assemble_context(matches, invocation)?;
            let workspace = ctx
                .workspace()
                .ok_or_else(|| SkyError::execution("execution context missing a workspace"))?;

            if self.disable_cmd_usage_event || !invocation.options.enable_telemetry {
                return action.run(&ctx, matches, &workspace).await;
            }

            // The path holds declared names only, so the span name never
            // carries user-supplied argument or flag values.
            let event_name = command_event_name(&path);
            let mut span = invocation.tracer.start(&event_name);
            let result = action
                .run(&ctx, matches, &workspace)
                .instrument(span.tracing_span())
                .await;
            if result.is_err() {
                span.set_error_status(UNKNOWN_ERROR);
            }
            // Dropping the handle closes the span on every exit path.
            result
        })
    }
}

/// Populate a fresh execution context for one invocation.
///
/// Runs the service assemblers in dependency order; the formatter resolves
/// before the writer and console, which both need to know whether structured
/// output owns stdout.
pub fn assemble_context(
    matches: &ArgMatches,
    invocation: &Invocation,
) -> Result<ExecutionContext> {
    let options = invocation.options.clone();

    let workspace = match &options.cwd {
        Some(dir) => Workspace::discover_from(dir),
        None => Workspace::discover()?,
    };

    let mut ctx = invocation
        .seed
        .with_options(options.clone())
        .with_workspace(workspace);

    // A broken credential environment is a fatal defect; the error carries
    // that classification up to the top-level loop instead of aborting here.
    if ctx.credential().is_none() {
        ctx = ctx.with_credential(Arc::new(SkyctlCredential::new()?));
    }

    ctx = ctx.with_runner(CommandRunner::new(
        invocation.handles.clone(),
        options.enable_debug_logging,
        options.enable_telemetry,
    ));
    ctx = ctx.with_tool_cache(InstalledCheckCache::new());

    let formatter = output::get_command_formatter(matches)?;
    if let Some(formatter) = formatter.clone() {
        ctx = ctx.with_formatter(formatter);
    }

    ctx = ctx.with_writer(select_writer(&invocation.handles.stdout));

    let interactive = console::is_interactive(&invocation.handles);
    ctx = ctx.with_console(Arc::new(TerminalConsole::new(
        !options.no_prompt,
        interactive,
        invocation.handles.clone(),
        formatter,
    )));

    Ok(ctx)
}

/// The assembled root command of the CLI.
pub struct CliApp {
    name: String,
    spec: Command,
    children: Vec<BuiltCommand>,
}

impl CliApp {
    pub fn new(name: &str, version: &'static str, about: &str, children: Vec<BuiltCommand>) -> Self {
        let mut spec = Command::new(name.to_string())
            .version(version)
            .about(about.to_string())
            .args(global_args())
            .subcommand_required(true)
            .arg_required_else_help(true);
        for child in &children {
            spec = spec.subcommand(child.spec().clone());
        }
        Self {
            name: name.to_string(),
            spec,
            children,
        }
    }

    /// Parse process argv. Help, version and usage errors stay with clap.
    pub fn parse(&self) -> std::result::Result<ArgMatches, clap::Error> {
        self.parse_from(std::env::args())
    }

    pub fn parse_from<I, T>(&self, argv: I) -> std::result::Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        self.spec.clone().try_get_matches_from(argv)
    }

    /// Route parsed matches to the built command they name.
    pub async fn dispatch(&self, matches: &ArgMatches, invocation: &Invocation) -> Result<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            SkyError::invalid_argument(format!("'{}' requires a subcommand", self.name))
        })?;
        let child = self
            .children
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| SkyError::invalid_argument(format!("unknown command '{}'", name)))?;
        child.invoke(&self.name, sub_matches, invocation).await
    }
}
