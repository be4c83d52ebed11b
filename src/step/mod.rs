//! Build steps
//!
//! One step is a single instruction derived from generated text: create or
//! overwrite one file, or an opaque instruction (shell command) forwarded to
//! the sandbox unmodified. Steps are append-only and kept for history; only
//! their status transitions.

pub mod queue;

use serde::{Deserialize, Serialize};

/// Monotonic step identifier within one build session.
pub type StepId = u64;

/// Step kind as emitted by the artifact step language.
///
/// Only `CreateFile` mutates the tree; every other kind passes through the
/// completion sweep untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    CreateFile,
    CreateFolder,
    EditFile,
    DeleteFile,
    RunCommand,
}

/// Step lifecycle status.
///
/// The queue only drives `Pending -> Completed` (or `Failed` on a path
/// conflict); `InProgress` is reserved for UI-driven selection and is never
/// set by the reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One build step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildStep {
    pub id: StepId,
    pub title: String,
    pub kind: StepKind,
    /// Slash-delimited virtual path, for file-addressed kinds.
    pub path: Option<String>,
    /// Whole-file replacement content, or the shell command for `RunCommand`.
    pub code: Option<String>,
    pub status: StepStatus,
    /// Human-readable reason when `status == Failed`.
    pub failure: Option<String>,
}

impl BuildStep {
    /// New pending file-creation step.
    pub fn create_file(id: StepId, path: impl Into<String>, code: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id,
            title: format!("Create {path}"),
            kind: StepKind::CreateFile,
            path: Some(path),
            code: Some(code.into()),
            status: StepStatus::Pending,
            failure: None,
        }
    }

    /// New pending shell-command step.
    pub fn run_command(id: StepId, command: impl Into<String>) -> Self {
        let command = command.into();
        Self {
            id,
            title: format!("Run {command}"),
            kind: StepKind::RunCommand,
            path: None,
            code: Some(command),
            status: StepStatus::Pending,
            failure: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }
}
