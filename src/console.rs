// file: src/console.rs
// version: 1.1.0
// guid: 4022254f-4884-4b3d-abbd-f138f79ac1cc

//! Console service: invocation I/O handles and interactive prompting

use crate::error::{Result, SkyError};
use crate::output::Formatter;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Where a command invocation reads its input from.
///
/// Commands run against the process's standard input; tests and embedders
/// script input through an in-memory buffer instead.
#[derive(Clone)]
pub enum InputStream {
    Stdin,
    Buffer(Arc<Mutex<io::Cursor<Vec<u8>>>>),
}

impl InputStream {
    /// An in-memory input stream pre-loaded with the given bytes.
    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(Arc::new(Mutex::new(io::Cursor::new(bytes.into()))))
    }

    /// True when this handle is the unmodified process standard input.
    pub fn is_process_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Read one line, without the trailing newline. Returns an empty string
    /// at end of input.
    pub fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        match self {
            Self::Stdin => {
                io::stdin().lock().read_line(&mut line)?;
            }
            Self::Buffer(cursor) => {
                let mut cursor = cursor.lock().unwrap_or_else(|e| e.into_inner());
                cursor.read_line(&mut line)?;
            }
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// Where a command invocation writes to.
#[derive(Clone)]
pub enum OutputStream {
    Stdout,
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

impl OutputStream {
    /// An in-memory output stream. Clones share the same backing buffer.
    pub fn buffer() -> Self {
        Self::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    /// True when this handle is the unmodified process standard output.
    pub fn is_process_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    /// Everything written so far, for buffer-backed streams.
    pub fn captured(&self) -> Option<String> {
        match self {
            Self::Buffer(buf) => {
                let buf = buf.lock().unwrap_or_else(|e| e.into_inner());
                Some(String::from_utf8_lossy(&buf).into_owned())
            }
            _ => None,
        }
    }
}

impl io::Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout => io::stdout().write(buf),
            Self::Stderr => io::stderr().write(buf),
            Self::Buffer(shared) => {
                let mut shared = shared.lock().unwrap_or_else(|e| e.into_inner());
                shared.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
            Self::Buffer(_) => Ok(()),
        }
    }
}

/// The three streams a command invocation is bound to.
#[derive(Clone)]
pub struct ConsoleHandles {
    pub stdin: InputStream,
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl ConsoleHandles {
    /// Handles bound to the process standard streams.
    pub fn from_process() -> Self {
        Self {
            stdin: InputStream::Stdin,
            stdout: OutputStream::Stdout,
            stderr: OutputStream::Stderr,
        }
    }

    /// Fully buffered handles with the given scripted input.
    pub fn piped(input: impl Into<Vec<u8>>) -> Self {
        Self {
            stdin: InputStream::buffer(input),
            stdout: OutputStream::buffer(),
            stderr: OutputStream::buffer(),
        }
    }

    /// True when both conversational ends are the process standard streams.
    pub fn is_process_std(&self) -> bool {
        self.stdin.is_process_stdin() && self.stdout.is_process_stdout()
    }
}

/// An invocation is interactive only when it talks to the process's own
/// standard streams and both of those are attached to a terminal.
pub fn is_interactive(handles: &ConsoleHandles) -> bool {
    handles.is_process_std() && io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// User conversation surface for commands.
pub trait Console: Send + Sync {
    fn is_interactive(&self) -> bool;

    /// Ask for a line of input. With prompting suppressed the default is
    /// returned; without one the caller gets a prompt-unavailable error.
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question. With prompting suppressed the default wins.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Status line for humans. Routed to stderr while a formatter owns
    /// stdout, so structured output stays parseable.
    fn message(&self, text: &str);

    /// A progress spinner; hidden when the invocation is not interactive.
    fn spinner(&self, message: &str) -> ProgressBar;
}

/// Console implementation over the invocation's stream handles.
pub struct TerminalConsole {
    prompt_enabled: bool,
    interactive: bool,
    handles: ConsoleHandles,
    formatter: Option<Arc<dyn Formatter>>,
}

impl TerminalConsole {
    pub fn new(
        prompt_enabled: bool,
        interactive: bool,
        handles: ConsoleHandles,
        formatter: Option<Arc<dyn Formatter>>,
    ) -> Self {
        Self {
            prompt_enabled,
            interactive,
            handles,
            formatter,
        }
    }

    /// Stream for conversational output. Structured output owns stdout, so
    /// conversation moves to stderr whenever a formatter is active.
    fn channel(&self) -> OutputStream {
        if self.formatter.is_some() {
            self.handles.stderr.clone()
        } else {
            self.handles.stdout.clone()
        }
    }
}

impl Console for TerminalConsole {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String> {
        if !self.prompt_enabled {
            return default.map(str::to_string).ok_or_else(|| {
                SkyError::prompt_unavailable(format!(
                    "prompting is disabled and no default exists for: {}",
                    message
                ))
            });
        }

        let mut out = self.channel();
        match default {
            Some(d) => write!(out, "{} [{}]: ", message, d)?,
            None => write!(out, "{}: ", message)?,
        }
        out.flush()?;

        let answer = self.handles.stdin.read_line()?;
        let answer = answer.trim();
        if answer.is_empty() {
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
        Ok(answer.to_string())
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        if !self.prompt_enabled {
            return Ok(default);
        }

        let mut out = self.channel();
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        write!(out, "{} {} ", message, hint)?;
        out.flush()?;

        let answer = self.handles.stdin.read_line()?;
        Ok(match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn message(&self, text: &str) {
        let mut out = self.channel();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner().with_message(message.to_string());
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::JsonFormatter;

    fn console(handles: &ConsoleHandles, prompt_enabled: bool) -> TerminalConsole {
        TerminalConsole::new(prompt_enabled, false, handles.clone(), None)
    }

    #[test]
    fn test_piped_handles_are_not_interactive() {
        // Arrange
        let handles = ConsoleHandles::piped("");

        // Assert
        assert!(!is_interactive(&handles));
        assert!(!handles.is_process_std());
    }

    #[test]
    fn test_output_buffer_captures_writes() {
        // Arrange
        let mut stream = OutputStream::buffer();

        // Act
        stream.write_all(b"hello").unwrap();

        // Assert
        assert_eq!(stream.captured().unwrap(), "hello");
    }

    #[test]
    fn test_prompt_reads_answer() {
        // Arrange
        let handles = ConsoleHandles::piped("atlas\n");

        // Act
        let answer = console(&handles, true).prompt("Project name", Some("app")).unwrap();

        // Assert
        assert_eq!(answer, "atlas");
        assert!(handles.stdout.captured().unwrap().contains("Project name"));
    }

    #[test]
    fn test_prompt_empty_answer_takes_default() {
        // Arrange
        let handles = ConsoleHandles::piped("\n");

        // Act
        let answer = console(&handles, true).prompt("Project name", Some("app")).unwrap();

        // Assert
        assert_eq!(answer, "app");
    }

    #[test]
    fn test_prompt_suppressed_returns_default_without_reading() {
        // Arrange
        let handles = ConsoleHandles::piped("typed-anyway\n");

        // Act
        let answer = console(&handles, false).prompt("Project name", Some("app")).unwrap();

        // Assert
        assert_eq!(answer, "app");
        // Nothing was asked.
        assert_eq!(handles.stdout.captured().unwrap(), "");
    }

    #[test]
    fn test_prompt_suppressed_without_default_is_an_error() {
        // Arrange
        let handles = ConsoleHandles::piped("");

        // Act
        let result = console(&handles, false).prompt("Project name", None);

        // Assert
        assert!(matches!(result, Err(SkyError::PromptUnavailable(_))));
    }

    #[test]
    fn test_confirm_parses_answers() {
        // Arrange
        let handles = ConsoleHandles::piped("y\nno\n\n");
        let console = console(&handles, true);

        // Act & Assert
        assert!(console.confirm("Overwrite?", false).unwrap());
        assert!(!console.confirm("Overwrite?", true).unwrap());
        // Empty answer falls back to the default.
        assert!(console.confirm("Overwrite?", true).unwrap());
    }

    #[test]
    fn test_confirm_suppressed_takes_default() {
        // Arrange
        let handles = ConsoleHandles::piped("y\n");

        // Act
        let confirmed = console(&handles, false).confirm("Overwrite?", false).unwrap();

        // Assert
        assert!(!confirmed);
    }

    #[test]
    fn test_message_routes_to_stderr_when_formatter_active() {
        // Arrange
        let handles = ConsoleHandles::piped("");
        let console = TerminalConsole::new(
            true,
            false,
            handles.clone(),
            Some(Arc::new(JsonFormatter) as Arc<dyn Formatter>),
        );

        // Act
        console.message("probing tools");

        // Assert
        assert_eq!(handles.stdout.captured().unwrap(), "");
        assert!(handles.stderr.captured().unwrap().contains("probing tools"));
    }

    #[test]
    fn test_message_uses_stdout_without_formatter() {
        // Arrange
        let handles = ConsoleHandles::piped("");

        // Act
        console(&handles, true).message("done");

        // Assert
        assert!(handles.stdout.captured().unwrap().contains("done"));
        assert_eq!(handles.stderr.captured().unwrap(), "");
    }

    #[test]
    fn test_spinner_hidden_when_not_interactive() {
        // Arrange
        let handles = ConsoleHandles::piped("");

        // Act
        let spinner = console(&handles, true).spinner("working");

        // Assert
        assert!(spinner.is_hidden());
        spinner.finish_and_clear();
    }
}
