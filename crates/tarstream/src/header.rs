// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Header encoding for archive entries
//!
//! Each entry is a GNU tar header block followed by the body padded to a
//! 512-byte boundary. Names and link targets too long for the fixed header
//! fields go out as GNU long-name and long-link extension entries ahead of
//! the real header; nothing is truncated.
//!
//! Permissions and timestamps are not taken from the nodes. Directories and
//! symlinks get `directory_mode` / `symlink_mode` (0777), files get
//! `file_mode` (0644). Directories and files are stamped with the encoding
//! time unless a fixed mtime is configured; symlinks always carry mtime 0.

use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tar::{Builder, EntryType, Header};

/// Timestamp source for directory and file headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MtimePolicy {
    /// Wall clock at the moment the header is encoded
    #[default]
    Now,
    /// Fixed Unix timestamp in seconds, for reproducible archives
    Fixed(u64),
}

/// Metadata stamped on every header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderOptions {
    pub directory_mode: u32,
    pub file_mode: u32,
    pub symlink_mode: u32,
    pub mtime: MtimePolicy,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            directory_mode: 0o777,
            file_mode: 0o644,
            symlink_mode: 0o777,
            mtime: MtimePolicy::Now,
        }
    }
}

/// Turns entry metadata into framed header blocks on a `tar::Builder`.
#[derive(Debug, Clone, Default)]
pub struct HeaderEncoder {
    options: HeaderOptions,
}

impl HeaderEncoder {
    #[must_use]
    pub fn new(options: HeaderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &HeaderOptions {
        &self.options
    }

    /// Directory entry: zero size, no body.
    pub fn encode_directory<W: Write>(&self, builder: &mut Builder<W>, path: &str) -> io::Result<()> {
        let mut header = self.header(
            EntryType::Directory,
            self.options.directory_mode,
            0,
            self.mtime(),
        );
        builder.append_data(&mut header, path, io::empty())
    }

    /// Regular file entry carrying `size`, followed by `body` and padding.
    ///
    /// `body` must produce exactly `size` bytes; the encoder copies whatever
    /// it yields with a bounded buffer and does not check the count.
    pub fn encode_file<W: Write, R: Read>(
        &self,
        builder: &mut Builder<W>,
        path: &str,
        size: u64,
        body: R,
    ) -> io::Result<()> {
        let mut header = self.header(EntryType::Regular, self.options.file_mode, size, self.mtime());
        builder.append_data(&mut header, path, body)
    }

    /// Symlink entry with `target` in the link field; no body.
    pub fn encode_symlink<W: Write>(
        &self,
        builder: &mut Builder<W>,
        path: &str,
        target: &Path,
    ) -> io::Result<()> {
        let mut header = self.header(EntryType::Symlink, self.options.symlink_mode, 0, 0);
        builder.append_link(&mut header, path, target)
    }

    fn mtime(&self) -> u64 {
        match self.options.mtime {
            MtimePolicy::Now => u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
            MtimePolicy::Fixed(secs) => secs,
        }
    }

    fn header(&self, kind: EntryType, mode: u32, size: u64, mtime: u64) -> Header {
        let mut header = Header::new_gnu();
        header.set_entry_type(kind);
        header.set_mode(mode);
        header.set_size(size);
        header.set_mtime(mtime);
        header.set_uid(0);
        header.set_gid(0);
        header
    }
}
