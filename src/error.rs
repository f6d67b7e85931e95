// file: src/error.rs
// version: 1.2.0
// guid: 64f6fdf3-2ad5-4ce6-96b8-b49ac4872574

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, SkyError>;

/// Error types for the Skyforge CLI
#[derive(Error, Debug)]
pub enum SkyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A defect in the host environment that no retry or user input can fix.
    /// Distinguished so the top-level loop can terminate with its own exit code.
    #[error("Environment defect: {0}")]
    EnvironmentDefect(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Command '{program}' failed with exit code {exit_code:?}: {stderr}")]
    CommandFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Command execution error: {0}")]
    Execution(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Prompt unavailable: {0}")]
    PromptUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SkyError {
    /// Create a new environment defect error
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::EnvironmentDefect(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new credential error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create a new prompt unavailable error
    pub fn prompt_unavailable(msg: impl Into<String>) -> Self {
        Self::PromptUnavailable(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for errors that signal a broken host environment rather than a
    /// failed operation. These terminate the process with exit code 2.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EnvironmentDefect(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defect_is_fatal() {
        // Arrange
        let err = SkyError::environment("config directory cannot be determined");

        // Assert
        assert!(err.is_fatal());
    }

    #[test]
    fn test_ordinary_errors_are_not_fatal() {
        // Arrange
        let errors = [
            SkyError::invalid_argument("unsupported output format"),
            SkyError::validation("missing required tools"),
            SkyError::credential("skyctl not logged in"),
        ];

        // Assert
        for err in errors {
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_command_failed_display_includes_program_and_code() {
        // Arrange
        let err = SkyError::CommandFailed {
            program: "skyctl".to_string(),
            exit_code: Some(3),
            stderr: "not logged in".to_string(),
        };

        // Act
        let text = err.to_string();

        // Assert
        assert!(text.contains("skyctl"));
        assert!(text.contains('3'));
        assert!(text.contains("not logged in"));
    }
}
