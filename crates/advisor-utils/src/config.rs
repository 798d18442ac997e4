//! Secret loading
//!
//! The model API key lives in a local `.env` file during development. When no
//! such file exists (hosted deployments) the key is read from the process
//! environment, which is where hosting platforms inject their secrets.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the Anthropic API key
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Errors raised while reading secrets
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `.env` file exists but could not be parsed
    #[error("Failed to read env file '{path}': {detail}")]
    EnvFile { path: String, detail: String },
}

/// Where the secrets were read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// A local dotenv file
    EnvFile(PathBuf),
    /// The process environment (platform secret store)
    Environment,
}

/// Secrets needed by the application
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    /// Anthropic API key, `None` when not configured
    pub anthropic_api_key: Option<String>,
    /// Origin of the values
    pub source: SecretSource,
}

impl Secrets {
    /// Whether an API key is available
    pub fn has_api_key(&self) -> bool {
        self.anthropic_api_key.is_some()
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("source", &self.source)
            .finish()
    }
}

/// Load secrets, preferring `env_file` when it exists
///
/// Variables already present in the process environment take precedence over
/// the file, matching dotenv semantics. A missing key is not an error.
pub fn load_secrets(env_file: impl AsRef<Path>) -> Result<Secrets, ConfigError> {
    let path = env_file.as_ref();
    let from_env = non_empty(std::env::var(API_KEY_VAR).ok());

    if path.exists() {
        debug!(path = %path.display(), "Loading secrets from env file");
        let from_file = read_key_from_file(path)?;
        return Ok(Secrets {
            anthropic_api_key: from_env.or(from_file),
            source: SecretSource::EnvFile(path.to_path_buf()),
        });
    }

    debug!("No env file found, using process environment");
    Ok(Secrets {
        anthropic_api_key: from_env,
        source: SecretSource::Environment,
    })
}

fn read_key_from_file(path: &Path) -> Result<Option<String>, ConfigError> {
    let to_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        detail: e.to_string(),
    };

    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        if key == API_KEY_VAR {
            return Ok(non_empty(Some(value)));
        }
    }
    Ok(None)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
