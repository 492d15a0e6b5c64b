// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::ops::Deref;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::node::Node;

/// Iterator over a directory's children, in the directory's own order.
///
/// An `Err` item ends the listing; callers stop at the first one.
pub type Entries = Box<dyn Iterator<Item = Result<(String, Node)>>>;

/// Represents a directory containing named entries.
pub trait Directory: Send {
    fn insert(&mut self, name: String, node: Node) -> Result<()>;

    fn entries(&self) -> Result<Entries>;
}

/// A handle for a shared directory.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn Directory>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn Directory>>>) -> Self {
        Self(r)
    }

    pub fn insert(&self, name: String, node: Node) -> Result<()> {
        self.try_lock()?.insert(name, node)
    }

    pub fn entries(&self) -> Result<Entries> {
        self.try_lock()?.entries()
    }

    /// Child names in iteration order. Stops at the first listing error.
    pub fn names(&self) -> Result<Vec<String>> {
        self.entries()?.map(|e| e.map(|(name, _)| name)).collect()
    }
}

impl Deref for Handle {
    type Target = Arc<Mutex<Box<dyn Directory>>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
