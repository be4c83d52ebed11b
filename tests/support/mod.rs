//! Shared test doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use weave::error::SandboxError;
use weave::sandbox::{SandboxRuntime, SpawnOutput};
use weave::tree::mount::MountDescriptor;

/// One recorded sandbox call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum SandboxCall {
    Mount { top_level_entries: usize },
    Write { path: String, contents: String },
    Spawn { command: String },
}

/// In-memory sandbox that records every call.
#[derive(Default)]
pub struct RecordingSandbox {
    calls: Mutex<Vec<SandboxCall>>,
    fail_mounts: Mutex<bool>,
}

#[allow(dead_code)]
impl RecordingSandbox {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<SandboxCall> {
        self.calls.lock().clone()
    }

    pub fn mount_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, SandboxCall::Mount { .. }))
            .count()
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SandboxCall::Write { path, contents } => Some((path.clone(), contents.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_mounts(&self, fail: bool) {
        *self.fail_mounts.lock() = fail;
    }
}

#[async_trait]
impl SandboxRuntime for RecordingSandbox {
    async fn mount(&self, descriptor: &MountDescriptor) -> Result<(), SandboxError> {
        if *self.fail_mounts.lock() {
            return Err(SandboxError::MountFailed("simulated failure".to_string()));
        }
        self.calls.lock().push(SandboxCall::Mount {
            top_level_entries: descriptor.len(),
        });
        Ok(())
    }

    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError> {
        self.calls.lock().push(SandboxCall::Write {
            path: path.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }

    async fn spawn(&self, command: &str, _args: &[String]) -> Result<SpawnOutput, SandboxError> {
        self.calls.lock().push(SandboxCall::Spawn {
            command: command.to_string(),
        });
        Ok(SpawnOutput {
            exit_code: 0,
            output: String::new(),
        })
    }
}
