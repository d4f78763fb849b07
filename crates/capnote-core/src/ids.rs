//! Identifier sources.
//!
//! The engine never mints ids on its own; callers hand in an [`IdSource`] so
//! the id scheme stays with the document store.

use std::cell::Cell;

/// Produces fresh identifiers for blocks and issues.
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, hyphenated.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, for fixtures and tests.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}
