// file: src/workspace.rs
// version: 1.0.0
// guid: 5d36f26d-6861-4fee-a55e-48981b4a2d23

//! Workspace discovery: the project directory a command operates in

use crate::error::{Result, SkyError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project file that marks a workspace root.
pub const PROJECT_FILE: &str = "skyforge.toml";

/// Parsed contents of the project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_environment: Option<String>,
}

/// The directory context a command runs in.
///
/// Captures the starting directory and, when an ancestor carries a project
/// file, the workspace root. Running outside a project is not an error;
/// commands that need one check `is_initialized`.
#[derive(Debug, Clone)]
pub struct Workspace {
    invoked_from: PathBuf,
    root: PathBuf,
    project_file: Option<PathBuf>,
}

impl Workspace {
    /// Discover the workspace from the process working directory.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SkyError::config(format!("cannot determine current directory: {}", e)))?;
        Ok(Self::discover_from(&cwd))
    }

    /// Discover the workspace from an explicit starting directory.
    pub fn discover_from(start: &Path) -> Self {
        let mut dir = Some(start);
        while let Some(candidate) = dir {
            let marker = candidate.join(PROJECT_FILE);
            if marker.is_file() {
                return Self {
                    invoked_from: start.to_path_buf(),
                    root: candidate.to_path_buf(),
                    project_file: Some(marker),
                };
            }
            dir = candidate.parent();
        }
        Self {
            invoked_from: start.to_path_buf(),
            root: start.to_path_buf(),
            project_file: None,
        }
    }

    /// Directory the invocation started from.
    pub fn invoked_from(&self) -> &Path {
        &self.invoked_from
    }

    /// Workspace root: the project directory, or the starting directory when
    /// no project file exists.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_file(&self) -> Option<&Path> {
        self.project_file.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.project_file.is_some()
    }

    /// Parse the project file.
    pub fn load_project(&self) -> Result<ProjectConfig> {
        let path = self.project_file.as_ref().ok_or_else(|| {
            SkyError::config(format!(
                "no {} found under {}; run 'sky init' first",
                PROJECT_FILE,
                self.invoked_from.display()
            ))
        })?;
        let raw = std::fs::read_to_string(path)?;
        let config: ProjectConfig = toml::from_str(&raw)?;
        Ok(config)
    }
}
