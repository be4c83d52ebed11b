//! Build session
//!
//! Owns the virtual file tree, the step list, and the sync bridge for one
//! build. The tree is created empty when the session starts, mutated only by
//! batch reconciliation and direct user edits, and discarded with the
//! session. Tree and queue mutations are synchronous; only sandbox calls
//! suspend.

use crate::error::{BuildError, SandboxError, TreeError};
use crate::generation::parse_artifact;
use crate::sandbox::bridge::SyncBridge;
use crate::sandbox::SandboxRuntime;
use crate::step::queue::reconcile_batch;
use crate::step::{BuildStep, StepId, StepStatus};
use crate::tree::mount::project;
use crate::tree::{update_file, FileTreeNode};
use std::sync::Arc;
use tracing::{info, warn};

/// What one reconcile pass did, for the caller's UI.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    pub completed: usize,
    pub failed: usize,
    /// Whether a full mount was issued during this pass.
    pub mounted_now: bool,
    /// Recoverable mount failure, surfaced as a notification. The tree has
    /// already been updated and stays authoritative.
    pub mount_error: Option<SandboxError>,
    /// Pass-through commands from this batch, in order.
    pub commands: Vec<String>,
}

/// One interactive build session.
pub struct BuilderSession {
    tree: Vec<FileTreeNode>,
    steps: Vec<BuildStep>,
    next_step_id: StepId,
    bridge: Arc<SyncBridge>,
}

impl BuilderSession {
    pub fn new() -> Self {
        Self {
            tree: Vec::new(),
            steps: Vec::new(),
            next_step_id: 1,
            bridge: Arc::new(SyncBridge::new()),
        }
    }

    pub fn tree(&self) -> &[FileTreeNode] {
        &self.tree
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    pub fn bridge(&self) -> &Arc<SyncBridge> {
        &self.bridge
    }

    pub fn pending_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_pending()).count()
    }

    /// Parse raw generated text and append its steps to the queue.
    /// Returns how many steps were appended.
    pub fn ingest_artifact(&mut self, text: &str) -> usize {
        let steps = parse_artifact(text, self.next_step_id);
        if let Some(last) = steps.last() {
            self.next_step_id = last.id + 1;
        }
        let appended = steps.len();
        if appended > 0 {
            info!(steps = appended, "Appended generated steps");
        }
        self.steps.extend(steps);
        appended
    }

    /// Append already-built steps (further generation rounds).
    pub fn append_steps(&mut self, steps: Vec<BuildStep>) {
        if let Some(max_id) = steps.iter().map(|s| s.id).max() {
            self.next_step_id = self.next_step_id.max(max_id + 1);
        }
        self.steps.extend(steps);
    }

    /// Attach a booted sandbox to this session's bridge.
    pub async fn attach_sandbox(
        &self,
        sandbox: Arc<dyn SandboxRuntime>,
    ) -> Result<(), SandboxError> {
        self.bridge.attach(sandbox).await
    }

    /// Fold all pending steps into the tree and, when the batch dirtied the
    /// tree, project it and request a full mount through the bridge.
    ///
    /// Safe to call repeatedly: a settled batch changes nothing and requests
    /// no mount. Mount failures are recoverable and reported in the summary,
    /// never rolled back into the tree.
    pub async fn reconcile(&mut self) -> ReconcileSummary {
        let outcome = reconcile_batch(&self.tree, &mut self.steps);
        let mut summary = ReconcileSummary {
            completed: outcome.completed,
            failed: outcome.failed,
            commands: outcome.commands,
            ..ReconcileSummary::default()
        };

        if let Some(tree) = outcome.tree {
            self.tree = tree;
            if !self.tree.is_empty() {
                match self.bridge.request_mount(project(&self.tree)).await {
                    Ok(mounted_now) => summary.mounted_now = mounted_now,
                    Err(err) => {
                        warn!(error = %err, "Mount after reconcile failed; tree kept");
                        summary.mount_error = Some(err);
                    }
                }
            }
        }

        summary
    }

    /// Apply a direct user edit to one file, bypassing the step queue.
    ///
    /// The tree is updated first and stays authoritative; the single-file
    /// sandbox write that follows never triggers a full re-mount, and its
    /// failure is returned for notification only.
    pub async fn edit_file(&mut self, path: &str, content: &str) -> Result<(), BuildError> {
        let next = update_file(&self.tree, path, content).ok_or_else(|| {
            TreeError::FileNotFound {
                path: path.to_string(),
            }
        })?;
        self.tree = next;

        self.bridge.sync_file(path, content).await?;
        Ok(())
    }

    /// Steps grouped by status, for UI partitions.
    pub fn steps_with_status(&self, status: StepStatus) -> impl Iterator<Item = &BuildStep> {
        self.steps.iter().filter(move |s| s.status == status)
    }
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}
