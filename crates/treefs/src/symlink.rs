// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::Result;

/// Represents a symbolic link to another path
pub trait Symlink: Send {
    fn readlink(&self) -> Result<PathBuf>;
}

/// A handle for a shared symlink.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn Symlink>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn Symlink>>>) -> Self {
        Self(r)
    }

    pub fn readlink(&self) -> Result<PathBuf> {
        self.0.try_lock()?.readlink()
    }
}
