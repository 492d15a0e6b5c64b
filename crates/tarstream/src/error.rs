// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for archive writing

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure aborts the archive in progress. Entries written before the
/// failure stay in the sink.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sink rejected header, body, padding or flush bytes
    #[error("Write error at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The header could not be encoded (e.g. a path the format cannot hold)
    #[error("Invalid header for {path}: {source}")]
    Header {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The node could not supply its size, stream or link target
    #[error("Source error at {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: treefs::Error,
    },

    /// Reading the file body failed
    #[error("Read error at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The stream did not hold exactly the declared number of bytes
    #[error("Size mismatch at {path}: declared {declared} bytes, stream had {actual}")]
    SizeMismatch {
        path: String,
        declared: u64,
        /// Bytes observed, at most `declared + 1`
        actual: u64,
    },

    /// The directory listing failed
    #[error("Directory iteration failed at {path}: {source}")]
    Iteration {
        path: String,
        #[source]
        source: treefs::Error,
    },

    #[error("Node kind {kind} is not supported at {path}")]
    Unsupported { path: String, kind: String },

    #[error("Archive cancelled before {path}")]
    Cancelled { path: String },

    /// Writing the end-of-archive marker failed
    #[error("Failed to finalize archive: {0}")]
    Close(#[source] std::io::Error),
}

impl Error {
    /// Path of the entry being written when the failure happened
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Write { path, .. }
            | Error::Header { path, .. }
            | Error::Source { path, .. }
            | Error::Read { path, .. }
            | Error::SizeMismatch { path, .. }
            | Error::Iteration { path, .. }
            | Error::Unsupported { path, .. }
            | Error::Cancelled { path } => Some(path),
            Error::Close(_) => None,
        }
    }
}
