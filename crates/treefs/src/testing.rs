// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Fault-injecting nodes
//!
//! Each fixture behaves like its memory counterpart up to a chosen point and
//! then fails, so consumers can check how a walk reacts to listing, size,
//! read and link failures.

use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::dir::{self, Directory, Entries};
use crate::error::{Error, Result};
use crate::file::{self, File};
use crate::node::Node;
use crate::symlink::{self, Symlink};

/// Directory that yields its children and then a listing error
pub struct FailingDirectory {
    children: Vec<(String, Node)>,
}

impl Directory for FailingDirectory {
    fn insert(&mut self, name: String, _node: Node) -> Result<()> {
        Err(Error::immutable(name))
    }

    fn entries(&self) -> Result<Entries> {
        let failure = Error::injected(format!(
            "listing failed after {} entries",
            self.children.len()
        ));
        let items: Vec<_> = self
            .children
            .iter()
            .cloned()
            .map(Ok)
            .chain(std::iter::once(Err(failure)))
            .collect();
        Ok(Box::new(items.into_iter()))
    }
}

impl FailingDirectory {
    /// Node yielding `children` in order, then failing
    pub fn new_node<S: Into<String>>(children: Vec<(S, Node)>) -> Node {
        let children = children.into_iter().map(|(n, c)| (n.into(), c)).collect();
        Node::Directory(dir::Handle::new(Arc::new(Mutex::new(Box::new(
            FailingDirectory { children },
        )))))
    }
}

/// Directory whose listing cannot even be started
pub struct UnlistableDirectory;

impl Directory for UnlistableDirectory {
    fn insert(&mut self, name: String, _node: Node) -> Result<()> {
        Err(Error::immutable(name))
    }

    fn entries(&self) -> Result<Entries> {
        Err(Error::injected("listing unavailable"))
    }
}

impl UnlistableDirectory {
    pub fn new_node() -> Node {
        Node::Directory(dir::Handle::new(Arc::new(Mutex::new(Box::new(
            UnlistableDirectory,
        )))))
    }
}

/// File whose size cannot be determined
pub struct FailingSizeFile;

impl File for FailingSizeFile {
    fn size(&self) -> Result<u64> {
        Err(Error::injected("size unavailable"))
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(std::io::empty()))
    }
}

impl FailingSizeFile {
    pub fn new_node() -> Node {
        Node::File(file::Handle::new(Arc::new(Mutex::new(Box::new(
            FailingSizeFile,
        )))))
    }
}

/// File that reports its full size but whose stream breaks after
/// `fail_at` bytes
pub struct FailingReaderFile {
    content: Vec<u8>,
    fail_at: usize,
}

struct BrokenStream {
    inner: Cursor<Vec<u8>>,
    remaining: usize,
}

impl Read for BrokenStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Err(std::io::Error::other("injected read failure"));
        }
        let len = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..len])?;
        self.remaining -= n;
        Ok(n)
    }
}

impl File for FailingReaderFile {
    fn size(&self) -> Result<u64> {
        Ok(self.content.len() as u64)
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(BrokenStream {
            inner: Cursor::new(self.content.clone()),
            remaining: self.fail_at.min(self.content.len()),
        }))
    }
}

impl FailingReaderFile {
    pub fn new_node<T: AsRef<[u8]>>(content: T, fail_at: usize) -> Node {
        Node::File(file::Handle::new(Arc::new(Mutex::new(Box::new(
            FailingReaderFile {
                content: content.as_ref().to_vec(),
                fail_at,
            },
        )))))
    }
}

/// File whose declared size disagrees with its stream
pub struct MisreportedFile {
    declared: u64,
    content: Vec<u8>,
}

impl File for MisreportedFile {
    fn size(&self) -> Result<u64> {
        Ok(self.declared)
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(Cursor::new(self.content.clone())))
    }
}

impl MisreportedFile {
    pub fn new_node<T: AsRef<[u8]>>(declared: u64, content: T) -> Node {
        Node::File(file::Handle::new(Arc::new(Mutex::new(Box::new(
            MisreportedFile {
                declared,
                content: content.as_ref().to_vec(),
            },
        )))))
    }
}

/// Symlink whose target cannot be read
pub struct UnreadableSymlink;

impl Symlink for UnreadableSymlink {
    fn readlink(&self) -> Result<PathBuf> {
        Err(Error::injected("link target unavailable"))
    }
}

impl UnreadableSymlink {
    pub fn new_node() -> Node {
        Node::Symlink(symlink::Handle::new(Arc::new(Mutex::new(Box::new(
            UnreadableSymlink,
        )))))
    }
}
