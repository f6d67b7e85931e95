// file: src/lib.rs
// version: 2.1.0
// guid: d82472d1-7f0f-4eb4-b0a3-6e1547103eb4

//! # Skyforge CLI
//!
//! Command construction and execution-context assembly for the `sky`
//! developer CLI. Commands are declared as [`commands::Action`]
//! implementations; the builder wires each one into an invocable command
//! that assembles its ambient services (credential, runner, console, writer,
//! formatter, tool cache) and brackets execution in a usage telemetry span.

pub mod commands;
pub mod console;
pub mod context;
pub mod error;
pub mod exec;
pub mod identity;
pub mod logging;
pub mod options;
pub mod output;
pub mod telemetry;
pub mod tools;
pub mod workspace;

pub use error::{Result, SkyError};

/// Version of the sky CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
