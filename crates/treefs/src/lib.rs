// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! TreeFS -- read-side node abstraction for tree exports
//!
//! A tree is a `Node`: a file with a declared size and a byte stream, a
//! directory with an ordered and fallible child listing, a symlink with a
//! target, or a special node that carries only its kind. Nodes are
//! shared handles over trait objects, so a tree can be assembled in
//! memory (`memory`), mapped lazily from the host (`hostmount`), or backed
//! by any other store that implements the traits.
//!
//! Handles are `Arc<Mutex<..>>`, so a tree built on one thread can be handed
//! to another. A node that is locked elsewhere reports `Error::Borrow`
//! instead of blocking.

pub mod dir;
mod entry_type;
mod error;
pub mod file;
pub mod hostmount;
pub mod memory;
mod node;
pub mod special;
pub mod symlink;
pub mod testing;


pub use dir::{Directory, Entries};
pub use entry_type::EntryType;
pub use error::{Error, Result};
pub use file::File;
pub use node::Node;
pub use special::Special;
pub use symlink::Symlink;
