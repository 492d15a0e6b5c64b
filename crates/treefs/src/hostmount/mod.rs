// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hostmount -- a host directory tree as lazy nodes
//!
//! Nothing is read until asked for: a directory lists its host entries when
//! `entries()` is called, and each child node is built only when the
//! iterator reaches it. File content is streamed from the host file.
//!
//! Children are listed in byte order of their names. Symlinks are reported
//! as symlinks, never followed. FIFOs, sockets and device nodes become
//! `Special` nodes. Host directories are read-only.

mod directory;
mod file;
mod symlink;


pub use directory::HostDirectory;
pub use file::HostFile;
pub use symlink::HostSymlink;

use std::fs::FileType;
use std::path::Path;

use crate::error::{Error, Result};
use crate::memory::MemorySpecial;
use crate::node::Node;

/// Build the node for a host path without following a final symlink
///
/// # Errors
///
/// Returns `NotFound` if nothing exists at `path`, or `Io` if it cannot be
/// inspected.
pub fn mount<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    let metadata = std::fs::symlink_metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::io(path, e)
        }
    })?;
    Ok(node_for(path, metadata.file_type()))
}

pub(crate) fn node_for(path: &Path, file_type: FileType) -> Node {
    let path = path.to_path_buf();
    if file_type.is_symlink() {
        Node::Symlink(HostSymlink::new_handle(path))
    } else if file_type.is_dir() {
        Node::Directory(HostDirectory::new_handle(path))
    } else if file_type.is_file() {
        Node::File(HostFile::new_handle(path))
    } else {
        Node::Special(MemorySpecial::new_handle(special_kind(file_type)))
    }
}

#[cfg(unix)]
fn special_kind(file_type: FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;
    if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "char device"
    } else {
        "unknown"
    }
}

#[cfg(not(unix))]
fn special_kind(_file_type: FileType) -> &'static str {
    "unknown"
}
