//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! JSON format, and stdout/stderr/file destinations.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, both (file+stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Resolve the log file path with precedence: config file path,
/// WEAVE_LOG_FILE env, platform default.
pub fn resolve_log_file_path(config_file: Option<&Path>) -> Result<PathBuf, BuildError> {
    if let Ok(env_path) = std::env::var("WEAVE_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p.to_path_buf());
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "weave", "weave").ok_or_else(|| {
        BuildError::Config("Could not determine platform state directory for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dirs.data_dir().to_path_buf());
    Ok(dir.join("weave.log"))
}

/// Initialize the global tracing subscriber from config.
pub fn init_logging(config: &LoggingConfig) -> Result<(), BuildError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.output.as_str() {
        "stdout" => formatted_layer(config, std::io::stdout, config.color),
        "file" => {
            let file = open_log_file(config)?;
            formatted_layer(config, move || Arc::clone(&file), false)
        }
        "both" | "file+stderr" => {
            let file = open_log_file(config)?;
            formatted_layer(
                config,
                (move || Arc::clone(&file)).and(std::io::stderr),
                false,
            )
        }
        _ => formatted_layer(config, std::io::stderr, config.color),
    };

    Registry::default()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| BuildError::Config(format!("Failed to initialize logging: {e}")))
}

fn open_log_file(config: &LoggingConfig) -> Result<Arc<std::fs::File>, BuildError> {
    let path = resolve_log_file_path(config.file.as_deref())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok(Arc::new(file))
}

fn formatted_layer<W>(
    config: &LoggingConfig,
    writer: W,
    ansi: bool,
) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    if config.format == "json" {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_ansi(ansi).with_writer(writer).boxed()
    }
}
