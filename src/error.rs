//! Typed error hierarchy for the build engine.
//!
//! Tree-mutation errors abort only the offending step; sandbox errors never
//! roll back tree state. Everything converts into [`BuildError`] at module
//! boundaries.

use thiserror::Error;

/// Errors raised while folding build steps into the virtual file tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A path segment expects a Folder where a File already exists, or vice
    /// versa. Never coerced; the offending step is marked failed.
    #[error("path conflict at '{path}': expected {expected}, found {found}")]
    Conflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("step has an empty virtual path")]
    EmptyPath,

    #[error("no file at '{path}'")]
    FileNotFound { path: String },
}

/// Errors from the sandbox runtime boundary.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// Mount/write attempted before the sandbox finished booting. Deferred
    /// and retried once the sandbox becomes available, not user-facing.
    #[error("sandbox is not available yet")]
    Unavailable,

    #[error("sandbox rejected mount: {0}")]
    MountFailed(String),

    #[error("sandbox rejected write to '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("failed to spawn '{command}' in sandbox: {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("sandbox boot did not complete within {timeout_ms}ms")]
    BootTimeout { timeout_ms: u64 },

    #[error("sandbox boot failed: {0}")]
    BootFailed(String),
}

/// Errors from the generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("generation backend returned malformed payload: {0}")]
    MalformedResponse(String),
}

/// Umbrella error for session-level operations.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("archive export failed: {0}")]
    Export(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
