//! Batch reconciliation and the step status machine.
//!
//! Folds every pending step into the tree in insertion order and sweeps the
//! whole pending set to a settled status afterwards. Re-invoking on an
//! already-settled batch is a true no-op so callers can skip downstream
//! projection and mount work.

use crate::step::{BuildStep, StepKind, StepStatus};
use crate::tree::reconciler::apply_step;
use crate::tree::FileTreeNode;
use tracing::{debug, warn};

/// Result of one batch reconciliation pass.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// New tree root, present only when at least one `CreateFile` step was
    /// applied. `None` means the caller's tree is still current and no
    /// re-projection or re-mount is needed.
    pub tree: Option<Vec<FileTreeNode>>,
    /// Steps transitioned to `Completed`.
    pub completed: usize,
    /// Steps transitioned to `Failed` (path conflicts).
    pub failed: usize,
    /// Commands from `RunCommand` steps in this batch, in order, for
    /// pass-through to the sandbox.
    pub commands: Vec<String>,
}

impl BatchOutcome {
    pub fn tree_changed(&self) -> bool {
        self.tree.is_some()
    }

    pub fn is_noop(&self) -> bool {
        self.completed == 0 && self.failed == 0
    }
}

/// Reconcile every pending step against `tree`.
///
/// `CreateFile` steps are applied sequentially in insertion order, so later
/// steps for the same path win. A conflicting step is marked `Failed` with
/// its reason recorded; prior steps' effects are kept. Every other pending
/// step is marked `Completed` without touching the tree. Already-settled
/// steps are never revisited.
pub fn reconcile_batch(tree: &[FileTreeNode], steps: &mut [BuildStep]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    let mut next: Option<Vec<FileTreeNode>> = None;

    for step in steps.iter_mut().filter(|s| s.is_pending()) {
        match step.kind {
            StepKind::CreateFile => {
                let current = next.as_deref().unwrap_or(tree);
                match apply_step(current, step) {
                    Ok(updated) => {
                        next = Some(updated);
                        step.status = StepStatus::Completed;
                        outcome.completed += 1;
                    }
                    Err(err) => {
                        warn!(
                            step_id = step.id,
                            path = step.path.as_deref().unwrap_or(""),
                            error = %err,
                            "Step failed to reconcile"
                        );
                        step.status = StepStatus::Failed;
                        step.failure = Some(err.to_string());
                        outcome.failed += 1;
                    }
                }
            }
            other => {
                if other == StepKind::RunCommand {
                    if let Some(command) = &step.code {
                        outcome.commands.push(command.clone());
                    }
                }
                step.status = StepStatus::Completed;
                outcome.completed += 1;
            }
        }
    }

    outcome.tree = next;
    if !outcome.is_noop() {
        debug!(
            completed = outcome.completed,
            failed = outcome.failed,
            tree_changed = outcome.tree_changed(),
            "Reconciled step batch"
        );
    }
    outcome
}
