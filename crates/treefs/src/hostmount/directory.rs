// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::dir::{Directory, Entries, Handle};
use crate::error::{Error, Result};
use crate::node::Node;

/// A directory backed by a host filesystem directory.
///
/// `entries()` reads the host listing and sorts it by name. Child nodes are
/// created lazily as the returned iterator advances; a child that vanished
/// or cannot be inspected yields an `Io` error at its position, and so does
/// a name that is not UTF-8. An error from the host listing itself is
/// yielded after the names read before it.
pub struct HostDirectory {
    host_path: PathBuf,
}

impl Directory for HostDirectory {
    fn insert(&mut self, name: String, _node: Node) -> Result<()> {
        Err(Error::immutable(name))
    }

    fn entries(&self) -> Result<Entries> {
        let read_dir =
            std::fs::read_dir(&self.host_path).map_err(|e| Error::io(&self.host_path, e))?;

        let mut names: Vec<OsString> = Vec::new();
        let mut listing_error = None;
        for entry in read_dir {
            match entry {
                Ok(entry) => names.push(entry.file_name()),
                Err(e) => {
                    listing_error = Some(Error::io(&self.host_path, e));
                    break;
                }
            }
        }
        names.sort();

        let parent = self.host_path.clone();
        let children = names.into_iter().map(move |name| -> Result<(String, Node)> {
            let child_path = parent.join(&name);
            let metadata =
                std::fs::symlink_metadata(&child_path).map_err(|e| Error::io(&child_path, e))?;
            let name = name.into_string().map_err(|_| {
                Error::io(
                    &child_path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "file name is not valid UTF-8",
                    ),
                )
            })?;
            let node = super::node_for(&child_path, metadata.file_type());
            Ok((name, node))
        });

        Ok(Box::new(children.chain(listing_error.map(Err))))
    }
}

impl HostDirectory {
    /// Create a Handle for the directory at `host_path`
    #[must_use]
    pub fn new_handle(host_path: PathBuf) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(HostDirectory { host_path }))))
    }
}
