// file: src/identity.rs
// version: 1.1.0
// guid: 852f4923-33b0-4c24-bf38-7aff6f20bc97

//! Credential acquisition delegated to the platform CLI

use crate::error::{Result, SkyError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Environment variable naming the platform CLI executable.
pub const ENV_CLI_PATH: &str = "SKYFORGE_CLI_PATH";

const DEFAULT_PROGRAM: &str = "skyctl";
const TOKEN_CACHE_FILE: &str = "token.json";

/// Cached tokens are reused only while comfortably inside their lifetime.
const EXPIRY_MARGIN_SECS: i64 = 120;

/// A bearer token for platform API calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token can still be used at `now`. Tokens without expiry
    /// information are never reused.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_on {
            Some(expires_on) => expires_on - Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => false,
        }
    }
}

/// Source of platform credentials.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Acquire a bearer token for the given scopes.
    async fn get_token(&self, scopes: &[String]) -> Result<AccessToken>;
}

/// Credential that delegates to the installed `skyctl` CLI, the way users are
/// already logged in.
///
/// Construction stays cheap: the program is not probed here, so a missing
/// `skyctl` surfaces as an ordinary error when a token is first requested.
/// What does fail construction is a broken environment: an explicit
/// `SKYFORGE_CLI_PATH` pointing nowhere, or no resolvable cache directory.
pub struct SkyctlCredential {
    program: PathBuf,
    cache_dir: PathBuf,
}

/// Shape of `skyctl auth token --output json`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    #[serde(default)]
    expires_on: Option<DateTime<Utc>>,
}

impl SkyctlCredential {
    pub fn new() -> Result<Self> {
        let program = match std::env::var(ENV_CLI_PATH) {
            Ok(raw) if !raw.is_empty() => {
                let expanded = shellexpand::tilde(&raw).into_owned();
                let path = PathBuf::from(expanded);
                if !path.is_file() {
                    return Err(SkyError::environment(format!(
                        "{} points to {}, which does not exist",
                        ENV_CLI_PATH,
                        path.display()
                    )));
                }
                path
            }
            _ => PathBuf::from(DEFAULT_PROGRAM),
        };

        let cache_dir = dirs::cache_dir()
            .map(|base| base.join("skyforge"))
            .ok_or_else(|| {
                SkyError::environment("cannot determine a cache directory for credentials")
            })?;

        Ok(Self { program, cache_dir })
    }

    /// Credential with a known CLI path and cache location.
    pub fn with_program(program: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cache_dir: cache_dir.into(),
        }
    }

    fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_CACHE_FILE)
    }

    fn read_cached(&self) -> Option<AccessToken> {
        let raw = std::fs::read_to_string(self.cache_file()).ok()?;
        let token: AccessToken = serde_json::from_str(&raw).ok()?;
        token.is_fresh(Utc::now()).then_some(token)
    }

    /// Best effort; a lost cache only costs a re-fetch.
    fn write_cache(&self, token: &AccessToken) {
        if std::fs::create_dir_all(&self.cache_dir).is_err() {
            return;
        }
        if let Ok(raw) = serde_json::to_string(token) {
            let _ = std::fs::write(self.cache_file(), raw);
        }
    }
}

#[async_trait]
impl TokenCredential for SkyctlCredential {
    async fn get_token(&self, scopes: &[String]) -> Result<AccessToken> {
        // Scoped tokens are not cached; only the default token is.
        if scopes.is_empty() {
            if let Some(cached) = self.read_cached() {
                debug!("using cached platform token");
                return Ok(cached);
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(["auth", "token", "--output", "json"]);
        for scope in scopes {
            cmd.args(["--scope", scope]);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            SkyError::credential(format!(
                "failed to run {}: {} (is skyctl installed and on PATH?)",
                self.program.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SkyError::credential(format!(
                "'{} auth token' failed: {}",
                self.program.display(),
                stderr.trim()
            )));
        }

        let response: TokenResponse = serde_json::from_slice(&output.stdout).map_err(|e| {
            SkyError::credential(format!(
                "unexpected token response from {}: {}",
                self.program.display(),
                e
            ))
        })?;

        let token = AccessToken {
            token: response.token,
            expires_on: response.expires_on,
        };
        if scopes.is_empty() {
            self.write_cache(&token);
        }
        Ok(token)
    }
}
