// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Memory-based node implementations
//!
//! Files hold their bytes, directories hold their children in insertion
//! order, symlinks hold their target. Used to build trees in tests and by
//! callers that assemble an export tree by hand.

mod directory;
mod file;
mod special;
mod symlink;

pub use directory::MemoryDirectory;
pub use file::MemoryFile;
pub use special::MemorySpecial;
pub use symlink::MemorySymlink;

use crate::error::Result;
use crate::node::Node;

/// File node holding `content`
pub fn file<T: AsRef<[u8]>>(content: T) -> Node {
    Node::File(MemoryFile::new_handle(content))
}

/// Symlink node pointing at `target`
pub fn symlink<P: Into<std::path::PathBuf>>(target: P) -> Node {
    Node::Symlink(MemorySymlink::new_handle(target))
}

/// Special node of the given kind
pub fn special<S: Into<String>>(kind: S) -> Node {
    Node::Special(MemorySpecial::new_handle(kind))
}

/// Directory node with `children` in the given order
///
/// # Errors
///
/// Returns `AlreadyExists` if two children share a name.
pub fn dir<S, I>(children: I) -> Result<Node>
where
    S: Into<String>,
    I: IntoIterator<Item = (S, Node)>,
{
    let handle = MemoryDirectory::new_handle();
    for (name, node) in children {
        handle.insert(name.into(), node)?;
    }
    Ok(Node::Directory(handle))
}
