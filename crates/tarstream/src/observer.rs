// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use treefs::Node;

use crate::error::Error;

/// Hook called around every node visit.
///
/// `on_enter` runs before anything is written for the node, `on_exit` after
/// the node (and for directories, everything beneath it) is done. A failed
/// child is reported to every ancestor's `on_exit` as well. Observers see
/// the walk; they cannot change it.
pub trait Observer {
    fn on_enter(&self, _path: &str, _node: &Node) {}

    fn on_exit(&self, _path: &str, _outcome: Result<(), &Error>) {}
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that emits a debug event per visit through `diagnostics`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn on_enter(&self, path: &str, node: &Node) {
        let kind = node.kind_name();
        diagnostics::debug!("tar write {path} ({kind})", path: path, kind: kind.as_str());
    }

    fn on_exit(&self, path: &str, outcome: Result<(), &Error>) {
        match outcome {
            Ok(()) => {
                diagnostics::debug!("tar wrote {path}", path: path);
            }
            Err(e) => {
                let reason = e.to_string();
                diagnostics::debug!("tar write {path} failed: {reason}", path: path, reason: reason.as_str());
            }
        }
    }
}
