//! Local directory sandbox
//!
//! Materializes the mount descriptor under a root directory on the real
//! filesystem and spawns processes there. Used by the CLI and integration
//! tests as the concrete runtime behind the bridge.

use super::{SandboxRuntime, SpawnOutput};
use crate::error::SandboxError;
use crate::tree::mount::{MountDescriptor, MountEntry};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sandbox rooted at a local directory.
pub struct LocalSandbox {
    root: PathBuf,
}

impl LocalSandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Flatten a descriptor into (directories, files) relative to `prefix`.
    fn flatten(
        entries: &BTreeMap<String, MountEntry>,
        prefix: &Path,
        dirs: &mut Vec<PathBuf>,
        files: &mut Vec<(PathBuf, String)>,
    ) {
        for (name, entry) in entries {
            let path = prefix.join(name);
            match entry {
                MountEntry::Directory(children) => {
                    dirs.push(path.clone());
                    Self::flatten(children, &path, dirs, files);
                }
                MountEntry::File { contents } => files.push((path, contents.clone())),
            }
        }
    }
}

#[async_trait]
impl SandboxRuntime for LocalSandbox {
    async fn mount(&self, descriptor: &MountDescriptor) -> Result<(), SandboxError> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        Self::flatten(descriptor, Path::new(""), &mut dirs, &mut files);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SandboxError::MountFailed(e.to_string()))?;
        for dir in dirs {
            tokio::fs::create_dir_all(self.root.join(dir))
                .await
                .map_err(|e| SandboxError::MountFailed(e.to_string()))?;
        }
        for (path, contents) in files {
            let absolute = self.root.join(path);
            if let Some(parent) = absolute.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SandboxError::MountFailed(e.to_string()))?;
            }
            tokio::fs::write(&absolute, contents)
                .await
                .map_err(|e| SandboxError::MountFailed(e.to_string()))?;
        }

        debug!(root = %self.root.display(), "Mounted descriptor into local sandbox");
        Ok(())
    }

    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError> {
        let absolute = self.resolve(path);
        let fail = |e: std::io::Error| SandboxError::WriteFailed {
            path: path.to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(fail)?;
        }
        tokio::fs::write(&absolute, contents).await.map_err(fail)
    }

    async fn spawn(&self, command: &str, args: &[String]) -> Result<SpawnOutput, SandboxError> {
        let output = tokio::process::Command::new(command)
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| SandboxError::SpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(SpawnOutput {
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}
