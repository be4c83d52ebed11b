//! Mount projection
//!
//! Converts the virtual file tree into the nested directory/file descriptor
//! consumed by the sandbox runtime's mount call. The descriptor is a derived,
//! read-only projection: recomputed from scratch on every call, never patched
//! incrementally.

use super::FileTreeNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level mount descriptor: name -> entry, with no wrapping root folder.
pub type MountDescriptor = BTreeMap<String, MountEntry>;

/// One entry in a mount descriptor.
///
/// Serializes to the wire shape the sandbox expects:
/// `{"directory": {..}}` for folders, `{"file": {"contents": ".."}}` for files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    Directory(BTreeMap<String, MountEntry>),
    File { contents: String },
}

/// Project the whole tree into a mount descriptor.
pub fn project(nodes: &[FileTreeNode]) -> MountDescriptor {
    nodes
        .iter()
        .map(|node| (node.name().to_string(), project_node(node)))
        .collect()
}

fn project_node(node: &FileTreeNode) -> MountEntry {
    match node {
        FileTreeNode::Folder(folder) => MountEntry::Directory(
            folder
                .children
                .iter()
                .map(|child| (child.name().to_string(), project_node(child)))
                .collect(),
        ),
        FileTreeNode::File(file) => MountEntry::File {
            contents: file.content.clone().unwrap_or_default(),
        },
    }
}
