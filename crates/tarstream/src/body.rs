// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Read};

/// Why a body stream was cut off
#[derive(Debug)]
pub(crate) enum BodyFailure {
    /// The source stream returned an error
    Read(io::Error),
    /// The stream ended after `copied` bytes, before the declared size
    Short { copied: u64 },
    /// The stream had bytes left after the declared size
    Long,
}

/// Yields exactly `declared` bytes of `inner` or fails.
///
/// Once `declared` bytes have been read, one more byte is probed; a stream
/// that is longer than declared fails instead of being truncated. Failures
/// are recorded so the caller can tell source problems from sink problems
/// after the copy returns.
pub(crate) struct ExactReader<R> {
    inner: R,
    declared: u64,
    copied: u64,
    failure: Option<BodyFailure>,
}

impl<R: Read> ExactReader<R> {
    pub(crate) fn new(inner: R, declared: u64) -> Self {
        Self {
            inner,
            declared,
            copied: 0,
            failure: None,
        }
    }

    pub(crate) fn into_failure(self) -> Option<BodyFailure> {
        self.failure
    }

    fn fail(&mut self, failure: BodyFailure) -> io::Error {
        let err = match &failure {
            BodyFailure::Read(_) => io::Error::other("body stream failed"),
            BodyFailure::Short { .. } => io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "body stream shorter than declared size",
            ),
            BodyFailure::Long => io::Error::new(
                io::ErrorKind::InvalidData,
                "body stream longer than declared size",
            ),
        };
        self.failure = Some(failure);
        err
    }

    fn probe_end(&mut self) -> io::Result<usize> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(0),
                Ok(_) => return Err(self.fail(BodyFailure::Long)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.fail(BodyFailure::Read(e))),
            }
        }
    }
}

impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failure.is_some() {
            return Err(io::Error::other("body stream already failed"));
        }
        if self.copied == self.declared {
            return self.probe_end();
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let remaining = self.declared - self.copied;
        let want = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        match self.inner.read(&mut buf[..want]) {
            Ok(0) => {
                let copied = self.copied;
                Err(self.fail(BodyFailure::Short { copied }))
            }
            Ok(n) => {
                self.copied += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => Err(self.fail(BodyFailure::Read(e))),
        }
    }
}
