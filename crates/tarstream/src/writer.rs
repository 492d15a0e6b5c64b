// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use treefs::{Node, dir, file, symlink};

use crate::body::{BodyFailure, ExactReader};
use crate::error::{Error, Result};
use crate::header::{HeaderEncoder, HeaderOptions};
use crate::observer::{NoopObserver, Observer};
use crate::sink::TrackedSink;

/// Configuration for a `TarWriter`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub header: HeaderOptions,
}

/// Counts of entries written so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    pub directories: u64,
    pub files: u64,
    pub symlinks: u64,
    /// File body bytes, excluding headers and padding
    pub body_bytes: u64,
}

impl ArchiveStats {
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.directories + self.files + self.symlinks
    }
}

/// Serializes node trees into a tar stream.
///
/// Entries are written strictly in walk order: a directory's header, then
/// each child in the order its listing yields them, depth first. Any
/// failure aborts the walk; entries already written stay in the sink.
///
/// The archive is finished by `close`, which writes the end-of-archive
/// marker. A writer dropped without `close` still writes the marker but
/// discards any error doing so.
pub struct TarWriter<W: Write> {
    builder: tar::Builder<TrackedSink<W>>,
    encoder: HeaderEncoder,
    observer: Box<dyn Observer>,
    cancel: Option<CancellationToken>,
    stats: ArchiveStats,
}

impl<W: Write> TarWriter<W> {
    /// Wrap `sink` with default header options.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    pub fn with_options(sink: W, options: WriterOptions) -> Self {
        Self {
            builder: tar::Builder::new(TrackedSink::new(sink)),
            encoder: HeaderEncoder::new(options.header),
            observer: Box::new(NoopObserver),
            cancel: None,
            stats: ArchiveStats::default(),
        }
    }

    /// Install a visit observer.
    #[must_use]
    pub fn observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Stop before the next node once `token` is cancelled.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn stats(&self) -> &ArchiveStats {
        &self.stats
    }

    /// Add `node` to the archive under `path`, recursing into directories.
    ///
    /// Children of a directory are written as `path + "/" + name`. Paths are
    /// not normalized or deduplicated, and the tree must be acyclic. A child
    /// named `""` or `"."` fails with `Error::Header`.
    pub fn write_node(&mut self, node: &Node, path: &str) -> Result<()> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(Error::Cancelled {
                path: path.to_string(),
            });
        }

        self.observer.on_enter(path, node);
        let result = match node {
            Node::Symlink(link) => self.write_symlink(link, path),
            Node::File(file) => self.write_file(file, path),
            Node::Directory(dir) => self.write_dir(dir, path),
            Node::Special(special) => Err(Error::Unsupported {
                path: path.to_string(),
                kind: special.kind(),
            }),
        };
        self.observer.on_exit(path, result.as_ref().map(|_| ()));
        result
    }

    /// Write the end-of-archive marker, flush, and hand the sink back.
    pub fn close(self) -> Result<W> {
        let stats = self.stats;
        let mut sink = self.builder.into_inner().map_err(Error::Close)?;
        sink.flush().map_err(Error::Close)?;

        diagnostics::log_info!(
            "Closed archive: {entries} entries, {body_bytes} body bytes",
            entries: stats.entries(),
            body_bytes: stats.body_bytes
        );
        Ok(sink.into_inner())
    }

    fn write_dir(&mut self, dir: &dir::Handle, path: &str) -> Result<()> {
        if let Err(e) = self.encoder.encode_directory(&mut self.builder, path) {
            return Err(self.encode_error(path, e));
        }
        self.stats.directories += 1;

        let entries = dir.entries().map_err(|source| Error::Iteration {
            path: path.to_string(),
            source,
        })?;
        for entry in entries {
            let (name, child) = entry.map_err(|source| Error::Iteration {
                path: path.to_string(),
                source,
            })?;
            let child_path = format!("{path}/{name}");
            if name.is_empty() || name == "." {
                // the tar crate would fold these onto the parent's path
                return Err(Error::Header {
                    path: child_path,
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("invalid entry name {name:?}"),
                    ),
                });
            }
            self.write_node(&child, &child_path)?;
        }
        Ok(())
    }

    fn write_file(&mut self, file: &file::Handle, path: &str) -> Result<()> {
        let size = file.size().map_err(|source| Error::Source {
            path: path.to_string(),
            source,
        })?;
        let stream = file.reader().map_err(|source| Error::Source {
            path: path.to_string(),
            source,
        })?;

        let mut body = ExactReader::new(stream, size);
        if let Err(e) = self
            .encoder
            .encode_file(&mut self.builder, path, size, &mut body)
        {
            return Err(match body.into_failure() {
                Some(BodyFailure::Read(source)) => Error::Read {
                    path: path.to_string(),
                    source,
                },
                Some(BodyFailure::Short { copied }) => Error::SizeMismatch {
                    path: path.to_string(),
                    declared: size,
                    actual: copied,
                },
                Some(BodyFailure::Long) => Error::SizeMismatch {
                    path: path.to_string(),
                    declared: size,
                    actual: size + 1,
                },
                None => self.encode_error(path, e),
            });
        }

        if let Err(source) = self.builder.get_mut().flush() {
            self.builder.get_mut().take_failure();
            return Err(Error::Write {
                path: path.to_string(),
                source,
            });
        }

        self.stats.files += 1;
        self.stats.body_bytes += size;
        diagnostics::log_debug!("Wrote {path}: {size} bytes", path: path, size: size);
        Ok(())
    }

    fn write_symlink(&mut self, link: &symlink::Handle, path: &str) -> Result<()> {
        let target = link.readlink().map_err(|source| Error::Source {
            path: path.to_string(),
            source,
        })?;
        if let Err(e) = self
            .encoder
            .encode_symlink(&mut self.builder, path, &target)
        {
            return Err(self.encode_error(path, e));
        }
        self.stats.symlinks += 1;
        Ok(())
    }

    /// Attribute an encoder failure to the sink or to the header itself.
    fn encode_error(&mut self, path: &str, source: std::io::Error) -> Error {
        let path = path.to_string();
        if self.builder.get_mut().take_failure() {
            Error::Write { path, source }
        } else {
            Error::Header { path, source }
        }
    }
}

/// Write the tree under `root` to `sink` as a complete archive.
///
/// The archive is closed exactly once, also when the walk fails, so a
/// working sink always ends with the end-of-archive marker. A walk error is
/// returned in preference to a close error; the close error is then only
/// logged.
pub fn export_tree<W: Write>(
    root: &Node,
    path: &str,
    sink: W,
    options: WriterOptions,
) -> Result<(W, ArchiveStats)> {
    let mut writer = TarWriter::with_options(sink, options);
    let walked = writer.write_node(root, path);
    let stats = writer.stats().clone();
    let closed = writer.close();

    match (walked, closed) {
        (Err(e), closed) => {
            let reason = e.to_string();
            diagnostics::log_error!("Export of {path} failed: {reason}", path: path, reason: reason.as_str());
            if let Err(close_err) = closed {
                let reason = close_err.to_string();
                diagnostics::log_warn!(
                    "Closing failed export of {path} also failed, end marker may be missing: {reason}",
                    path: path,
                    reason: reason.as_str()
                );
            }
            Err(e)
        }
        (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(sink)) => Ok((sink, stats)),
    }
}
