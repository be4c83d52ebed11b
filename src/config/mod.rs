//! Configuration
//!
//! Layered config composition: built-in defaults, an optional config file,
//! then a `WEAVE__`-prefixed environment overlay (double underscore
//! separates nested keys, e.g. `WEAVE__BACKEND__API_URL`).

use crate::error::BuildError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the template/chat backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// Sandbox runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// How long to wait for the boot signal before giving up.
    #[serde(default = "default_boot_timeout_ms")]
    pub boot_timeout_ms: u64,

    /// Root directory for the local sandbox; None means caller-provided.
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

fn default_boot_timeout_ms() -> u64 {
    30_000
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            boot_timeout_ms: default_boot_timeout_ms(),
            workdir: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an explicit file (or the platform config
    /// dir's `config.toml` when none is given) with environment overlay.
    pub fn load(explicit: Option<&Path>) -> Result<WeaveConfig, BuildError> {
        let mut builder = Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                if let Some(dirs) = directories::ProjectDirs::from("", "weave", "weave") {
                    let global = dirs.config_dir().join("config.toml");
                    builder = builder.add_source(File::from(global).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("WEAVE")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| BuildError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_section() {
        let config = WeaveConfig::default();
        assert_eq!(config.backend.api_url, "http://localhost:3000");
        assert_eq!(config.sandbox.boot_timeout_ms, 30_000);
        assert!(config.logging.enabled);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[backend]\napi_url = \"http://backend.test\"\n\n[sandbox]\nboot_timeout_ms = 500"
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.backend.api_url, "http://backend.test");
        assert_eq!(config.sandbox.boot_timeout_ms, 500);
        // untouched section keeps defaults
        assert_eq!(config.logging.level, "info");
    }
}
