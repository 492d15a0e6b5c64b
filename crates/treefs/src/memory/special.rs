// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};

use crate::special::{Handle, Special};

/// A special node that only knows its kind
pub struct MemorySpecial {
    kind: String,
}

impl Special for MemorySpecial {
    fn kind(&self) -> String {
        self.kind.clone()
    }
}

impl MemorySpecial {
    #[must_use]
    pub fn new_handle<S: Into<String>>(kind: S) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(MemorySpecial {
            kind: kind.into(),
        }))))
    }
}
