// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Read;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use crate::error::Result;

/// Represents a file with a declared size and a byte stream
pub trait File: Send {
    /// Number of bytes `reader()` will produce.
    fn size(&self) -> Result<u64>;

    /// Open a fresh stream over the file content, positioned at the start.
    fn reader(&self) -> Result<Box<dyn Read>>;
}

/// A handle for a shared file.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn File>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn File>>>) -> Self {
        Self(r)
    }

    pub fn size(&self) -> Result<u64> {
        self.try_lock()?.size()
    }

    pub fn reader(&self) -> Result<Box<dyn Read>> {
        self.try_lock()?.reader()
    }
}

impl Deref for Handle {
    type Target = Arc<Mutex<Box<dyn File>>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
