// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for paths and shapes.
//!
//! Each `EntityId` is a monotonically increasing `u64` generated from a global
//! atomic counter. A path keeps its id when it is committed into a shape, so
//! selection references survive the commit. Ids are never reused and are not
//! persisted: loading a document assigns fresh ones.

use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a path or shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Create a new unique entity ID
    pub fn next() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn default_allocates_fresh_id() {
        let a = EntityId::default();
        let b = EntityId::default();
        assert_ne!(a, b);
    }
}
