//! Virtual file tree
//!
//! In-memory hierarchical representation of the generated project,
//! independent of any real filesystem. Nodes are addressed by their
//! root-relative, leading-slash path; that path is the lookup key and is
//! never recomputed from tree position.

pub mod mount;
pub mod reconciler;

use serde::{Deserialize, Serialize};

/// File node: a leaf holding full file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub content: Option<String>,
}

/// Folder node: an ordered sequence of uniquely-named children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    pub path: String,
    pub children: Vec<FileTreeNode>,
}

/// Tagged file tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileTreeNode {
    File(FileNode),
    Folder(FolderNode),
}

impl FileTreeNode {
    pub fn name(&self) -> &str {
        match self {
            FileTreeNode::File(f) => &f.name,
            FileTreeNode::Folder(f) => &f.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileTreeNode::File(f) => &f.path,
            FileTreeNode::Folder(f) => &f.path,
        }
    }

}

/// Strip the single leading slash from a virtual path, yielding the
/// sandbox-relative form used for sandbox writes and archive entries.
pub fn sandbox_relative(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Find the File node at `path`, searching recursively.
pub fn find_file<'a>(nodes: &'a [FileTreeNode], path: &str) -> Option<&'a FileNode> {
    for node in nodes {
        match node {
            FileTreeNode::File(f) if f.path == path => return Some(f),
            FileTreeNode::Folder(f) => {
                if let Some(found) = find_file(&f.children, path) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace the content of the File node at `path`, preserving all siblings.
///
/// Returns the new root sequence, or `None` when no File node exists at
/// that path. Pure: the input sequence is never mutated.
pub fn update_file(nodes: &[FileTreeNode], path: &str, content: &str) -> Option<Vec<FileTreeNode>> {
    let mut replaced = false;
    let next = update_file_inner(nodes, path, content, &mut replaced);
    replaced.then_some(next)
}

fn update_file_inner(
    nodes: &[FileTreeNode],
    path: &str,
    content: &str,
    replaced: &mut bool,
) -> Vec<FileTreeNode> {
    nodes
        .iter()
        .map(|node| match node {
            FileTreeNode::File(f) if f.path == path => {
                *replaced = true;
                FileTreeNode::File(FileNode {
                    content: Some(content.to_string()),
                    ..f.clone()
                })
            }
            FileTreeNode::Folder(f) => FileTreeNode::Folder(FolderNode {
                name: f.name.clone(),
                path: f.path.clone(),
                children: update_file_inner(&f.children, path, content, replaced),
            }),
            other => other.clone(),
        })
        .collect()
}

/// Collect every File node as a (path, content) pair in depth-first order.
pub fn collect_files(nodes: &[FileTreeNode]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect_files_inner(nodes, &mut out);
    out
}

fn collect_files_inner(nodes: &[FileTreeNode], out: &mut Vec<(String, String)>) {
    for node in nodes {
        match node {
            FileTreeNode::File(f) => {
                out.push((f.path.clone(), f.content.clone().unwrap_or_default()))
            }
            FileTreeNode::Folder(f) => collect_files_inner(&f.children, out),
        }
    }
}
