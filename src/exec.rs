// file: src/exec.rs
// version: 1.1.0
// guid: 8a508b07-840c-4842-a24c-41d3169a6d6a

//! Subprocess execution service bound to the invocation's streams

use crate::console::{ConsoleHandles, OutputStream};
use crate::error::{Result, SkyError};
use crate::options::ENV_NO_TELEMETRY;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

/// Arguments for one subprocess run.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Attach the child to the invocation's terminal instead of capturing.
    pub interactive: bool,
}

impl RunArgs {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            interactive: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Outcome of a completed subprocess run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs platform and developer tools on behalf of commands.
///
/// Bound at assembly time to the invocation's stream handles and to the root
/// debug/telemetry toggles; spawned platform CLIs inherit the telemetry
/// opt-out through the environment.
pub struct CommandRunner {
    handles: ConsoleHandles,
    debug: bool,
    enable_telemetry: bool,
}

impl CommandRunner {
    pub fn new(handles: ConsoleHandles, debug: bool, enable_telemetry: bool) -> Self {
        Self {
            handles,
            debug,
            enable_telemetry,
        }
    }

    /// Run to completion. Non-interactive runs capture stdout and stderr; a
    /// non-zero exit becomes `CommandFailed` carrying the collected stderr.
    pub async fn run(&self, run_args: RunArgs) -> Result<RunResult> {
        if self.debug {
            debug!(program = %run_args.program, args = ?run_args.args, "running command");
        }

        let mut cmd = Command::new(&run_args.program);
        cmd.args(&run_args.args);
        if let Some(dir) = &run_args.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &run_args.env {
            cmd.env(key, value);
        }
        if !self.enable_telemetry {
            cmd.env(ENV_NO_TELEMETRY, "1");
        }

        if run_args.interactive {
            self.run_attached(cmd, &run_args).await
        } else {
            self.run_captured(cmd, &run_args).await
        }
    }

    async fn run_captured(&self, mut cmd: Command, run_args: &RunArgs) -> Result<RunResult> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            SkyError::execution(format!("failed to execute {}: {}", run_args.program, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            error!(
                program = %run_args.program,
                exit_code = ?output.status.code(),
                "command failed"
            );
            return Err(SkyError::CommandFailed {
                program: run_args.program.clone(),
                exit_code: output.status.code(),
                stderr: if stderr.trim().is_empty() { stdout } else { stderr },
            });
        }

        Ok(RunResult {
            exit_code: output.status.code().unwrap_or(0),
            stdout,
            stderr,
        })
    }

    async fn run_attached(&self, mut cmd: Command, run_args: &RunArgs) -> Result<RunResult> {
        // The child may own a stream only where the invocation itself does;
        // buffered invocations give it nothing to read or write.
        if self.handles.stdin.is_process_stdin() {
            cmd.stdin(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null());
        }
        if self.handles.stdout.is_process_stdout() {
            cmd.stdout(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null());
        }
        if matches!(self.handles.stderr, OutputStream::Stderr) {
            cmd.stderr(Stdio::inherit());
        } else {
            cmd.stderr(Stdio::null());
        }

        let status = cmd.status().await.map_err(|e| {
            SkyError::execution(format!("failed to execute {}: {}", run_args.program, e))
        })?;

        if !status.success() {
            return Err(SkyError::CommandFailed {
                program: run_args.program.clone(),
                exit_code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(RunResult {
            exit_code: status.code().unwrap_or(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
