//! Sandbox sync bridge
//!
//! Sole writer to the sandbox instance: the reconciler and projector never
//! touch the sandbox directly. Mount and single-file writes are serialized
//! through one internal queue so a full mount never races a file write, and
//! operations attempted before boot are deferred and flushed on attach. The
//! in-memory tree stays authoritative regardless of sandbox outcomes.

use super::SandboxRuntime;
use crate::error::SandboxError;
use crate::sandbox::BootSignal;
use crate::tree::mount::MountDescriptor;
use crate::tree::sandbox_relative;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

enum SandboxOp {
    FullMount(MountDescriptor),
    WriteFile { path: String, contents: String },
}

/// Bridge between the virtual file tree and the sandbox runtime.
pub struct SyncBridge {
    sandbox: RwLock<Option<Arc<dyn SandboxRuntime>>>,
    /// Whether a full mount has occurred for the attached sandbox instance.
    mounted: AtomicBool,
    /// Operations queued while the sandbox was unavailable.
    deferred: Mutex<VecDeque<SandboxOp>>,
    /// Serializes all sandbox calls; a mount never interleaves with a write.
    ops: tokio::sync::Mutex<()>,
}

impl SyncBridge {
    pub fn new() -> Self {
        Self {
            sandbox: RwLock::new(None),
            mounted: AtomicBool::new(false),
            deferred: Mutex::new(VecDeque::new()),
            ops: tokio::sync::Mutex::new(()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.sandbox.read().is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Await the boot signal, then attach the booted sandbox.
    pub async fn await_boot(
        &self,
        signal: BootSignal,
        timeout: Duration,
    ) -> Result<(), SandboxError> {
        let sandbox = signal.wait(timeout).await?;
        self.attach(sandbox).await
    }

    /// Attach a booted sandbox instance and flush deferred operations in
    /// their original order.
    ///
    /// A flush failure is recoverable: remaining operations are still
    /// attempted, the first error is returned, and the tree is unaffected.
    pub async fn attach(&self, sandbox: Arc<dyn SandboxRuntime>) -> Result<(), SandboxError> {
        let _guard = self.ops.lock().await;
        *self.sandbox.write() = Some(Arc::clone(&sandbox));
        self.mounted.store(false, Ordering::Release);
        info!("Sandbox attached");

        let queued: Vec<SandboxOp> = self.deferred.lock().drain(..).collect();
        let mut first_error = None;
        for op in queued {
            let result = match &op {
                SandboxOp::FullMount(descriptor) => {
                    let result = sandbox.mount(descriptor).await;
                    if result.is_ok() {
                        self.mounted.store(true, Ordering::Release);
                        info!(entries = descriptor.len(), "Mounted deferred tree");
                    }
                    result
                }
                SandboxOp::WriteFile { path, contents } => {
                    debug!(path = %path, "Flushing deferred file write");
                    sandbox.write_file(path, contents).await
                }
            };
            if let Err(err) = result {
                warn!(error = %err, "Deferred sandbox operation failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Mount the projected tree.
    ///
    /// When the sandbox is unavailable the descriptor is queued, coalescing
    /// with any previously queued mount so first availability mounts the
    /// latest tree exactly once. Returns whether a mount was issued now.
    pub async fn request_mount(
        &self,
        descriptor: MountDescriptor,
    ) -> Result<bool, SandboxError> {
        let _guard = self.ops.lock().await;
        let sandbox = self.sandbox.read().clone();
        match sandbox {
            Some(sandbox) => {
                sandbox
                    .mount(&descriptor)
                    .await
                    .map_err(|err| {
                        warn!(error = %err, "Sandbox mount failed");
                        err
                    })?;
                self.mounted.store(true, Ordering::Release);
                info!(entries = descriptor.len(), "Mounted tree into sandbox");
                Ok(true)
            }
            None => {
                let mut deferred = self.deferred.lock();
                if let Some(SandboxOp::FullMount(existing)) = deferred
                    .iter_mut()
                    .find(|op| matches!(op, SandboxOp::FullMount(_)))
                {
                    *existing = descriptor;
                } else {
                    deferred.push_back(SandboxOp::FullMount(descriptor));
                }
                debug!("Sandbox unavailable, mount deferred");
                Ok(false)
            }
        }
    }

    /// Write one file's new content into the sandbox filesystem.
    ///
    /// The virtual path's leading slash is stripped; this never triggers a
    /// full re-mount. Returns whether the write was issued now.
    pub async fn sync_file(&self, path: &str, contents: &str) -> Result<bool, SandboxError> {
        let _guard = self.ops.lock().await;
        let relative = sandbox_relative(path).to_string();
        let sandbox = self.sandbox.read().clone();
        match sandbox {
            Some(sandbox) => {
                sandbox
                    .write_file(&relative, contents)
                    .await
                    .map_err(|err| {
                        warn!(path = %relative, error = %err, "Sandbox file write failed");
                        err
                    })?;
                debug!(path = %relative, "Synced file into sandbox");
                Ok(true)
            }
            None => {
                self.deferred.lock().push_back(SandboxOp::WriteFile {
                    path: relative,
                    contents: contents.to_string(),
                });
                debug!(path = %path, "Sandbox unavailable, file write deferred");
                Ok(false)
            }
        }
    }

    /// Run a pass-through command in the sandbox, if one is attached.
    pub async fn run_command(
        &self,
        command: &str,
        args: &[String],
    ) -> Result<super::SpawnOutput, SandboxError> {
        let _guard = self.ops.lock().await;
        let sandbox = self.sandbox.read().clone();
        match sandbox {
            Some(sandbox) => sandbox.spawn(command, args).await,
            None => Err(SandboxError::Unavailable),
        }
    }
}

impl Default for SyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
