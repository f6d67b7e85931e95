// file: src/options.rs
// version: 1.0.0
// guid: 1d64ddbc-19ea-4a0f-83bc-d23105b6871e

//! Root-level options shared by every command invocation

use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, ArgMatches};
use std::path::PathBuf;

/// Environment variable that suppresses interactive prompting.
pub const ENV_NO_PROMPT: &str = "SKYFORGE_NO_PROMPT";

/// Environment variable that disables usage telemetry, for this process and
/// for any platform CLIs it spawns.
pub const ENV_NO_TELEMETRY: &str = "SKYFORGE_NO_TELEMETRY";

/// Values of the root flags, bound once per invocation and carried into the
/// execution context.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Directory to treat as the starting point for workspace discovery.
    pub cwd: Option<PathBuf>,
    pub enable_debug_logging: bool,
    pub enable_telemetry: bool,
    pub no_prompt: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            enable_debug_logging: false,
            enable_telemetry: true,
            no_prompt: false,
        }
    }
}

impl GlobalOptions {
    /// Bind option values from parsed root matches plus the process environment.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            cwd: matches.get_one::<String>("cwd").map(PathBuf::from),
            enable_debug_logging: matches.get_flag("debug"),
            enable_telemetry: std::env::var_os(ENV_NO_TELEMETRY).is_none(),
            no_prompt: matches.get_flag("no-prompt"),
        }
    }
}

/// Flag declarations installed on the root command and propagated to every
/// subcommand.
pub fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("debug")
            .long("debug")
            .global(true)
            .help("Enable debug-level logging")
            .action(ArgAction::SetTrue),
        Arg::new("no-prompt")
            .long("no-prompt")
            .global(true)
            .env(ENV_NO_PROMPT)
            .value_parser(FalseyValueParser::new())
            .help("Accept defaults instead of prompting")
            .action(ArgAction::SetTrue),
        Arg::new("cwd")
            .short('C')
            .long("cwd")
            .global(true)
            .value_name("DIR")
            .help("Run as if sky was started in DIR instead of the current directory"),
    ]
}
