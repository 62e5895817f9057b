//! MessagePack snapshots of a declaration tree.
//!
//! Snapshots store the arena, including free slots and generations, so
//! handles taken before saving stay valid after loading. Caches are not
//! stored; a loaded tree starts with every cache empty.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use cppdecl_foundation::{DeclId, Error, ErrorKind, ModelConfig, Result};
use serde::{Deserialize, Serialize};

use crate::decl::Declaration;
use crate::tree::DeclTree;

#[derive(Serialize, Deserialize)]
struct TreeSnapshot {
    generations: Vec<u32>,
    nodes: Vec<Option<Declaration>>,
    free_list: Vec<u32>,
    live_count: usize,
    root: DeclId,
    cache_enabled: bool,
}

impl TreeSnapshot {
    fn capture(tree: &DeclTree) -> Self {
        Self {
            generations: tree.generations.clone(),
            nodes: tree.nodes.clone(),
            free_list: tree.free_list.clone(),
            live_count: tree.live_count,
            root: tree.root,
            cache_enabled: tree.config.cache_enabled,
        }
    }

    fn restore(self) -> Result<DeclTree> {
        if self.generations.len() != self.nodes.len() {
            return Err(Error::new(ErrorKind::Serialization(format!(
                "snapshot has {} generations for {} slots",
                self.generations.len(),
                self.nodes.len()
            ))));
        }
        let tree = DeclTree {
            generations: self.generations,
            nodes: self.nodes,
            free_list: self.free_list,
            live_count: self.live_count,
            root: self.root,
            config: ModelConfig {
                cache_enabled: self.cache_enabled,
            },
            revision: 0,
            identity: crate::tree::next_identity(),
        };
        if !tree.exists(tree.root) {
            return Err(Error::new(ErrorKind::Serialization(
                "snapshot root is not a live declaration".to_string(),
            )));
        }
        Ok(tree)
    }
}

/// Serializes a tree to MessagePack bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn to_bytes(tree: &DeclTree) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&TreeSnapshot::capture(tree))
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a tree from MessagePack bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid snapshot.
pub fn from_bytes(bytes: &[u8]) -> Result<DeclTree> {
    let snapshot: TreeSnapshot = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))?;
    snapshot.restore()
}

/// Writes a snapshot to a file.
///
/// # Errors
///
/// Returns an error if encoding or any file operation fails.
pub fn save_to_file(tree: &DeclTree, path: impl AsRef<Path>) -> Result<()> {
    let bytes = to_bytes(tree)?;
    let file = File::create(path.as_ref()).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to create file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to write file '{}': {e}",
            path.as_ref().display()
        )))
    })?;
    writer.flush().map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to flush file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    tracing::debug!(path = %path.as_ref().display(), bytes = bytes.len(), "saved declaration snapshot");
    Ok(())
}

/// Reads a snapshot from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<DeclTree> {
    let file = File::open(path.as_ref()).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to open file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    from_bytes(&bytes)
}
