// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Streaming tar export for node trees
//!
//! `TarWriter` walks a `treefs::Node` depth first and writes one archive
//! entry per node straight to a byte sink. File bodies are copied through a
//! bounded buffer, so memory use does not depend on file size, and
//! directories are listed lazily as the walk reaches them.
//!
//! ```text
//! Node tree → TarWriter (walk, paths) → HeaderEncoder (framing) → sink
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tarstream::{TarWriter, WriterOptions};
//! use treefs::memory::{dir, file, symlink};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = dir([
//!     ("a", file(b"hi")),
//!     ("b", dir(Vec::<(String, treefs::Node)>::new())?),
//!     ("c", symlink("a")),
//! ])?;
//!
//! let mut writer = TarWriter::new(Vec::new());
//! writer.write_node(&root, "root")?;
//! let archive: Vec<u8> = writer.close()?;
//! assert_eq!(archive.len() % 512, 0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod body;
mod error;
pub mod header;
pub mod observer;
mod sink;
mod writer;

pub use error::{Error, Result};
pub use header::{HeaderEncoder, HeaderOptions, MtimePolicy};
pub use observer::{LoggingObserver, NoopObserver, Observer};
pub use tokio_util::sync::CancellationToken;
pub use writer::{ArchiveStats, TarWriter, WriterOptions, export_tree};
