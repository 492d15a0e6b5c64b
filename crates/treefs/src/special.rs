// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};

/// A node that is neither file, directory nor symlink: named pipes,
/// sockets, devices, or provider-specific objects.
pub trait Special: Send {
    /// Short human-readable kind, e.g. "fifo".
    fn kind(&self) -> String;
}

/// A handle for a shared special node.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn Special>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn Special>>>) -> Self {
        Self(r)
    }

    /// Kind name, or "special" when the node is being modified
    pub fn kind(&self) -> String {
        self.0
            .try_lock()
            .map(|s| s.kind())
            .unwrap_or_else(|_| "special".to_string())
    }
}
