// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::symlink::{Handle, Symlink};

/// A host symlink; the target is read on demand and not resolved.
pub struct HostSymlink {
    host_path: PathBuf,
}

impl Symlink for HostSymlink {
    fn readlink(&self) -> Result<PathBuf> {
        std::fs::read_link(&self.host_path).map_err(|e| Error::io(&self.host_path, e))
    }
}

impl HostSymlink {
    #[must_use]
    pub fn new_handle(host_path: PathBuf) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(HostSymlink { host_path }))))
    }
}
