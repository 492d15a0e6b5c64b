// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::TryLockError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by node implementations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Immutable directory, cannot insert: {0}")]
    Immutable(String),

    #[error("Object being modified: {0}")]
    Borrow(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure produced by the fault-injecting nodes in `testing`
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl Error {
    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn already_exists<S: AsRef<str>>(name: S) -> Self {
        Error::AlreadyExists(name.as_ref().to_string())
    }

    pub fn immutable<S: AsRef<str>>(name: S) -> Self {
        Error::Immutable(name.as_ref().to_string())
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn injected<S: AsRef<str>>(what: S) -> Self {
        Error::Injected(what.as_ref().to_string())
    }
}

impl<T> From<TryLockError<T>> for Error {
    fn from(err: TryLockError<T>) -> Error {
        Error::Borrow(err.to_string())
    }
}
