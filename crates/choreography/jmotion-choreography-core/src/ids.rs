//! Typed handles used instead of string identifiers for cross references.

use serde::{Deserialize, Serialize};

/// Handle of a registered motion path (joint orbit or hold path).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PathId(pub u32);

/// Position of a segment inside its owning chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SegmentIndex(pub usize);

/// Monotonic allocator for PathId.
#[derive(Clone, Default, Debug)]
pub struct IdAllocator {
    next_path: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_path(&mut self) -> PathId {
        let id = PathId(self.next_path);
        self.next_path = self.next_path.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_path(), PathId(0));
        assert_eq!(alloc.alloc_path(), PathId(1));
        assert_eq!(alloc.alloc_path(), PathId(2));
    }
}
