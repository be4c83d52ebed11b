//! Step reconciliation
//!
//! Folds one path-addressed build step into the virtual file tree. Pure:
//! every application returns a new root sequence, so callers never observe a
//! partially-applied walk through shared aliases.

use super::{FileNode, FileTreeNode, FolderNode};
use crate::error::TreeError;
use crate::step::BuildStep;

/// Apply one `CreateFile` step to the tree, returning the new root sequence.
///
/// Walks the path segments left to right, accumulating a `/`-prefixed path
/// prefix. Intermediate segments find-or-create a Folder at the accumulated
/// prefix; the final segment overwrites an existing File's content or
/// appends a new File with `step.code` as its whole content. Idempotent:
/// re-applying the same step overwrites without duplicating nodes.
///
/// A File found where a Folder is expected (or the reverse) is a
/// [`TreeError::Conflict`]; nothing is coerced.
pub fn apply_step(root: &[FileTreeNode], step: &BuildStep) -> Result<Vec<FileTreeNode>, TreeError> {
    let path = step.path.as_deref().ok_or(TreeError::EmptyPath)?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(TreeError::EmptyPath);
    }

    let content = step.code.as_deref().unwrap_or_default();
    insert(root, "", &segments, content)
}

fn insert(
    nodes: &[FileTreeNode],
    parent_path: &str,
    segments: &[&str],
    content: &str,
) -> Result<Vec<FileTreeNode>, TreeError> {
    let segment = segments[0];
    let path = format!("{parent_path}/{segment}");
    let mut next: Vec<FileTreeNode> = nodes.to_vec();
    let existing = next.iter().position(|n| n.path() == path);

    if segments.len() == 1 {
        // final segment: the file itself
        match existing {
            Some(idx) => match &mut next[idx] {
                FileTreeNode::File(file) => file.content = Some(content.to_string()),
                FileTreeNode::Folder(_) => {
                    return Err(TreeError::Conflict {
                        path,
                        expected: "file",
                        found: "folder",
                    })
                }
            },
            None => next.push(FileTreeNode::File(FileNode {
                name: segment.to_string(),
                path,
                content: Some(content.to_string()),
            })),
        }
    } else {
        match existing {
            Some(idx) => {
                let children = match &next[idx] {
                    FileTreeNode::Folder(folder) => {
                        insert(&folder.children, &path, &segments[1..], content)?
                    }
                    FileTreeNode::File(_) => {
                        return Err(TreeError::Conflict {
                            path,
                            expected: "folder",
                            found: "file",
                        })
                    }
                };
                if let FileTreeNode::Folder(folder) = &mut next[idx] {
                    folder.children = children;
                }
            }
            None => {
                let children = insert(&[], &path, &segments[1..], content)?;
                next.push(FileTreeNode::Folder(FolderNode {
                    name: segment.to_string(),
                    path,
                    children,
                }));
            }
        }
    }

    Ok(next)
}
