//! Identity: arena handles and the id allocator
//!
//! Handles are indices into the world arenas. Ids are the user-facing,
//! monotonically increasing integers bodies/constraints/composites carry.

use serde::{Deserialize, Serialize};

/// Index of a body in the body arena
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub usize);

/// Index of a constraint in the constraint arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintHandle(pub usize);

/// Index of a composite in the composite arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeHandle(pub usize);

/// Hands out ids for one world. Owned by the world rather than global, so
/// independent simulations (and tests) never share a counter.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next_id: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Start counting after `last` (used when adopting another world's objects)
    pub fn starting_after(last: u32) -> Self {
        Self { next_id: last.saturating_add(1) }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn peek(&self) -> u32 {
        self.next_id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_independent() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        assert_eq!(a.next_id(), 1);
        assert_eq!(a.next_id(), 2);
        assert_eq!(b.next_id(), 1);
        assert_eq!(IdAllocator::starting_after(41).next_id(), 42);
    }
}
