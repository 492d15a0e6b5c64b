// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::entry_type::EntryType;

/// A tree element. Nodes carry no identity of their own; the path a walk
/// reaches them by is the only name they have.
#[derive(Clone)]
pub enum Node {
    File(crate::file::Handle),
    Directory(crate::dir::Handle),
    Symlink(crate::symlink::Handle),
    Special(crate::special::Handle),
}

impl Node {
    /// Archivable kind, or `None` for special nodes
    #[must_use]
    pub fn entry_type(&self) -> Option<EntryType> {
        match self {
            Node::File(_) => Some(EntryType::File),
            Node::Directory(_) => Some(EntryType::Directory),
            Node::Symlink(_) => Some(EntryType::Symlink),
            Node::Special(_) => None,
        }
    }

    /// Kind name for messages: the entry type, or the special node's own kind
    #[must_use]
    pub fn kind_name(&self) -> String {
        match self {
            Node::Special(s) => s.kind(),
            other => other
                .entry_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn as_file(&self) -> Option<&crate::file::Handle> {
        if let Node::File(f) = self { Some(f) } else { None }
    }

    pub fn as_dir(&self) -> Option<&crate::dir::Handle> {
        if let Node::Directory(d) = self { Some(d) } else { None }
    }

    pub fn as_symlink(&self) -> Option<&crate::symlink::Handle> {
        if let Node::Symlink(s) = self { Some(s) } else { None }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.kind_name())
    }
}
