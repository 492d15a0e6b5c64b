// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::file::{File, Handle};

/// Represents a file backed by a host filesystem file.
///
/// The size is the host file's length at the time `size()` is called; the
/// host file is opened anew by every `reader()`.
pub struct HostFile {
    host_path: PathBuf,
}

impl File for HostFile {
    fn size(&self) -> Result<u64> {
        let metadata =
            std::fs::metadata(&self.host_path).map_err(|e| Error::io(&self.host_path, e))?;
        Ok(metadata.len())
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        let file =
            std::fs::File::open(&self.host_path).map_err(|e| Error::io(&self.host_path, e))?;
        Ok(Box::new(file))
    }
}

impl HostFile {
    #[must_use]
    pub fn new_handle(host_path: PathBuf) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(HostFile { host_path }))))
    }
}
