// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};

use crate::dir::{Directory, Entries, Handle};
use crate::error::{Error, Result};
use crate::node::Node;

/// Represents a directory backed by a vector of named children
///
/// Iteration follows insertion order, not name order.
pub struct MemoryDirectory {
    entries: Vec<(String, Node)>,
}

impl Directory for MemoryDirectory {
    fn insert(&mut self, name: String, node: Node) -> Result<()> {
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(Error::already_exists(&name));
        }
        self.entries.push((name, node));
        Ok(())
    }

    fn entries(&self) -> Result<Entries> {
        let items: Vec<_> = self.entries.iter().cloned().map(Ok).collect();
        Ok(Box::new(items.into_iter()))
    }
}

impl MemoryDirectory {
    /// Create a new, empty MemoryDirectory handle
    #[must_use]
    pub fn new_handle() -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(MemoryDirectory {
            entries: Vec::new(),
        }))))
    }
}
