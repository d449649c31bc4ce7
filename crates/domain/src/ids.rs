//! Scene identifiers and per-build allocation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a scene within a single story build.
///
/// Ids are small monotonic integers rather than UUIDs: they only need to be
/// unique within one build session, and the exporter's label scheme
/// (`scene_<id>`) relies on them being short and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneId(u32);

impl SceneId {
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates monotonically increasing scene ids for one build session.
///
/// The allocator is owned by the session that builds the graph. Ids start
/// at 1 and are never reused within a build.
#[derive(Debug, Default)]
pub struct SceneIdAllocator {
    next: u32,
}

impl SceneIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> SceneId {
        self.next += 1;
        SceneId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_start_at_one() {
        let mut allocator = SceneIdAllocator::new();
        assert_eq!(allocator.allocate(), SceneId::from_raw(1));
        assert_eq!(allocator.allocate(), SceneId::from_raw(2));
        assert_eq!(allocator.allocate(), SceneId::from_raw(3));
    }

    #[test]
    fn separate_allocators_do_not_share_state() {
        let mut a = SceneIdAllocator::new();
        let mut b = SceneIdAllocator::new();
        a.allocate();
        a.allocate();
        assert_eq!(b.allocate(), SceneId::from_raw(1));
    }
}
