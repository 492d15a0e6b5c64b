// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::file::{File, Handle};

/// Represents a file backed by memory
///
/// Content is shared, so each `reader()` is a cursor over the same bytes.
pub struct MemoryFile {
    content: Arc<[u8]>,
}

impl File for MemoryFile {
    fn size(&self) -> Result<u64> {
        Ok(self.content.len() as u64)
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(Cursor::new(self.content.clone())))
    }
}

impl MemoryFile {
    /// Create a new MemoryFile handle with the given content
    pub fn new_handle<T: AsRef<[u8]>>(content: T) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(MemoryFile {
            content: Arc::from(content.as_ref()),
        }))))
    }
}
