// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::symlink::{Handle, Symlink};

/// Represents a symbolic link to another path
pub struct MemorySymlink {
    target: PathBuf,
}

impl Symlink for MemorySymlink {
    fn readlink(&self) -> Result<PathBuf> {
        Ok(self.target.clone())
    }
}

impl MemorySymlink {
    /// Create a new MemorySymlink handle with the given target
    #[must_use]
    pub fn new_handle<P: Into<PathBuf>>(target: P) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(MemorySymlink {
            target: target.into(),
        }))))
    }
}
