//! Composite - a tree of bodies, constraints and child composites
//!
//! Flattened member lists are cached per composite and dropped whenever the
//! composite (or anything below it) is modified.

use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::core::ids::{BodyHandle, CompositeHandle, ConstraintHandle, IdAllocator};

/// Anything that can be added to or removed from a composite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "handle", rename_all = "camelCase")]
pub enum Member {
    Body(BodyHandle),
    Constraint(ConstraintHandle),
    Composite(CompositeHandle),
    /// A mouse drag wrapper. Only its inner constraint joins the composite.
    MouseConstraint(ConstraintHandle),
}

/// Kind filter for `World::get`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Body,
    Constraint,
    Composite,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct CompositeCache {
    pub(crate) all_bodies: Option<Vec<BodyHandle>>,
    pub(crate) all_constraints: Option<Vec<ConstraintHandle>>,
    pub(crate) all_composites: Option<Vec<CompositeHandle>>,
}

impl CompositeCache {
    fn invalidate(&mut self) {
        self.all_bodies = None;
        self.all_constraints = None;
        self.all_composites = None;
    }
}

#[derive(Clone, Debug)]
pub struct Composite {
    pub id: u32,
    pub label: String,
    pub parent: Option<CompositeHandle>,
    pub is_modified: bool,
    pub bodies: Vec<BodyHandle>,
    pub constraints: Vec<ConstraintHandle>,
    pub composites: Vec<CompositeHandle>,
    pub(crate) cache: CompositeCache,
}

impl Composite {
    pub fn contains(&self, member: Member) -> bool {
        match member {
            Member::Body(body) => self.bodies.contains(&body),
            Member::Constraint(c) | Member::MouseConstraint(c) => self.constraints.contains(&c),
            Member::Composite(child) => self.composites.contains(&child),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Composites {
    items: Vec<Composite>,
}

impl Composites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, ids: &mut IdAllocator, label: &str) -> CompositeHandle {
        let handle = CompositeHandle(self.items.len());
        self.items.push(Composite {
            id: ids.next_id(),
            label: label.to_string(),
            parent: None,
            is_modified: false,
            bodies: Vec::new(),
            constraints: Vec::new(),
            composites: Vec::new(),
            cache: CompositeCache::default(),
        });
        handle
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: CompositeHandle) -> Option<&Composite> {
        self.items.get(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Composite> {
        self.items.iter()
    }

    /// Flag a composite as (un)modified, optionally walking up to the root
    /// and/or down through every child. Setting the flag drops cached lists.
    pub fn set_modified(
        &mut self,
        handle: CompositeHandle,
        is_modified: bool,
        update_parents: bool,
        update_children: bool,
    ) {
        let composite = &mut self.items[handle.0];
        composite.is_modified = is_modified;
        if is_modified {
            composite.cache.invalidate();
        }

        if update_parents {
            if let Some(parent) = composite.parent {
                self.set_modified(parent, is_modified, true, update_children);
            }
        }

        if update_children {
            for i in 0..self.items[handle.0].composites.len() {
                let child = self.items[handle.0].composites[i];
                self.set_modified(child, is_modified, update_parents, true);
            }
        }
    }

    pub fn all_bodies(&mut self, handle: CompositeHandle) -> Vec<BodyHandle> {
        if let Some(cached) = &self.items[handle.0].cache.all_bodies {
            return cached.clone();
        }
        let mut bodies = self.items[handle.0].bodies.clone();
        for i in 0..self.items[handle.0].composites.len() {
            let child = self.items[handle.0].composites[i];
            bodies.extend(self.all_bodies(child));
        }
        self.items[handle.0].cache.all_bodies = Some(bodies.clone());
        bodies
    }

    pub fn all_constraints(&mut self, handle: CompositeHandle) -> Vec<ConstraintHandle> {
        if let Some(cached) = &self.items[handle.0].cache.all_constraints {
            return cached.clone();
        }
        let mut constraints = self.items[handle.0].constraints.clone();
        for i in 0..self.items[handle.0].composites.len() {
            let child = self.items[handle.0].composites[i];
            constraints.extend(self.all_constraints(child));
        }
        self.items[handle.0].cache.all_constraints = Some(constraints.clone());
        constraints
    }

    /// Every descendant composite (not including `handle` itself)
    pub fn all_composites(&mut self, handle: CompositeHandle) -> Vec<CompositeHandle> {
        if let Some(cached) = &self.items[handle.0].cache.all_composites {
            return cached.clone();
        }
        let mut composites = self.items[handle.0].composites.clone();
        for i in 0..self.items[handle.0].composites.len() {
            let child = self.items[handle.0].composites[i];
            composites.extend(self.all_composites(child));
        }
        self.items[handle.0].cache.all_composites = Some(composites.clone());
        composites
    }

    pub(crate) fn reassign_id(&mut self, handle: CompositeHandle, id: u32) {
        self.items[handle.0].id = id;
    }
}

impl Index<CompositeHandle> for Composites {
    type Output = Composite;

    fn index(&self, handle: CompositeHandle) -> &Composite {
        &self.items[handle.0]
    }
}

impl IndexMut<CompositeHandle> for Composites {
    fn index_mut(&mut self, handle: CompositeHandle) -> &mut Composite {
        &mut self.items[handle.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_dropped_when_a_child_changes() {
        let mut ids = IdAllocator::new();
        let mut composites = Composites::new();
        let root = composites.create(&mut ids, "root");
        let child = composites.create(&mut ids, "child");

        composites[root].composites.push(child);
        composites[child].parent = Some(root);
        composites[root].bodies.push(BodyHandle(0));
        assert_eq!(composites.all_bodies(root), vec![BodyHandle(0)]);

        composites[child].bodies.push(BodyHandle(1));
        // stale until flagged
        assert_eq!(composites.all_bodies(root), vec![BodyHandle(0)]);

        composites.set_modified(child, true, true, false);
        assert!(composites[root].is_modified);
        assert_eq!(composites.all_bodies(root), vec![BodyHandle(0), BodyHandle(1)]);
        assert_eq!(composites.all_composites(root), vec![child]);

        composites.set_modified(root, false, false, true);
        assert!(!composites[child].is_modified);
    }
}
