//! Sandbox runtime abstraction
//!
//! The engine depends on two sandbox operations only: mounting the projected
//! tree and writing a single file. Process spawning is the pass-through for
//! command steps. Boot readiness is a one-shot completion signal awaited
//! with a timeout, never a callback.

pub mod bridge;
pub mod local;

use crate::error::SandboxError;
use crate::tree::mount::MountDescriptor;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Output of a spawned sandbox process.
#[derive(Debug, Clone)]
pub struct SpawnOutput {
    pub exit_code: i32,
    pub output: String,
}

/// Sandboxed execution environment.
#[async_trait]
pub trait SandboxRuntime: Send + Sync {
    /// Materialize the whole mount descriptor inside the sandbox filesystem.
    async fn mount(&self, descriptor: &MountDescriptor) -> Result<(), SandboxError>;

    /// Write one file at a sandbox-relative path (no leading slash).
    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError>;

    /// Run a command inside the sandbox and wait for it to exit.
    async fn spawn(&self, command: &str, args: &[String]) -> Result<SpawnOutput, SandboxError>;
}

impl std::fmt::Debug for dyn SandboxRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn SandboxRuntime")
    }
}

/// Create a linked boot sender/signal pair.
///
/// The boot sequence resolves the sender exactly once with the ready
/// sandbox; the bridge side awaits the signal with a timeout so test suites
/// can simulate boot failure deterministically.
pub fn boot_channel() -> (BootSender, BootSignal) {
    let (tx, rx) = oneshot::channel();
    (BootSender { tx }, BootSignal { rx })
}

/// Resolves the boot signal once the sandbox is ready.
pub struct BootSender {
    tx: oneshot::Sender<Arc<dyn SandboxRuntime>>,
}

impl BootSender {
    /// Mark the sandbox as booted. Ignores a dropped receiver.
    pub fn ready(self, sandbox: Arc<dyn SandboxRuntime>) {
        let _ = self.tx.send(sandbox);
    }
}

/// One-shot boot completion signal.
pub struct BootSignal {
    rx: oneshot::Receiver<Arc<dyn SandboxRuntime>>,
}

impl BootSignal {
    /// Wait for the sandbox to boot, up to `timeout`.
    pub async fn wait(self, timeout: Duration) -> Result<Arc<dyn SandboxRuntime>, SandboxError> {
        let timeout_ms = timeout.as_millis() as u64;
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(sandbox)) => Ok(sandbox),
            Ok(Err(_)) => Err(SandboxError::BootFailed(
                "boot sequence dropped without completing".to_string(),
            )),
            Err(_) => Err(SandboxError::BootTimeout { timeout_ms }),
        }
    }
}
