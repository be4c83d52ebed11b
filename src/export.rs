//! Archive export
//!
//! Projects the virtual file tree into a zip archive: one entry per File
//! node at its folder-joined path, honoring the same leading-slash-stripping
//! rule used for sandbox writes. Empty folders get explicit directory
//! entries so the extracted layout matches the tree.

use crate::error::BuildError;
use crate::tree::{sandbox_relative, FileTreeNode};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Write the tree as a zip archive into `writer`, returning it on finish.
pub fn write_archive<W: Write + Seek>(tree: &[FileTreeNode], writer: W) -> Result<W, BuildError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();
    add_nodes(&mut zip, tree, options)?;
    zip.finish().map_err(|e| BuildError::Export(e.to_string()))
}

/// Export the tree as a zip archive at `path`.
pub fn export_to_file(tree: &[FileTreeNode], path: &Path) -> Result<(), BuildError> {
    let file = std::fs::File::create(path)?;
    write_archive(tree, file)?;
    info!(path = %path.display(), "Exported project archive");
    Ok(())
}

fn add_nodes<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    nodes: &[FileTreeNode],
    options: SimpleFileOptions,
) -> Result<(), BuildError> {
    for node in nodes {
        match node {
            FileTreeNode::File(file) => {
                zip.start_file(sandbox_relative(&file.path), options)
                    .map_err(|e| BuildError::Export(e.to_string()))?;
                zip.write_all(file.content.as_deref().unwrap_or_default().as_bytes())?;
            }
            FileTreeNode::Folder(folder) => {
                if folder.children.is_empty() {
                    zip.add_directory(sandbox_relative(&folder.path), options)
                        .map_err(|e| BuildError::Export(e.to_string()))?;
                } else {
                    add_nodes(zip, &folder.children, options)?;
                }
            }
        }
    }
    Ok(())
}
