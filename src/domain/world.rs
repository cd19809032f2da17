//! World - owns the arenas and the root composite
//!
//! Structural edits (add/remove/clear/move) go through here so the
//! modified flags, sleep counters and composite events stay in step.

use crate::core::error::EngineError;
use crate::core::events::{EventSource, Observers};
use crate::core::ids::{BodyHandle, CompositeHandle, ConstraintHandle, IdAllocator};
use crate::core::log::Logger;
use crate::core::math::{Bounds, Vector};
use crate::domain::body::{Bodies, BodyOptions};
use crate::domain::composite::{Composites, Member, MemberKind};
use crate::domain::constraint::{ConstraintOptions, Constraints};

/// Payload of the composite add/remove events
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeEvent {
    pub objects: Vec<Member>,
}

#[derive(Debug)]
pub struct CompositeEvents {
    pub before_add: Observers<CompositeEvent>,
    pub after_add: Observers<CompositeEvent>,
    pub before_remove: Observers<CompositeEvent>,
    pub after_remove: Observers<CompositeEvent>,
}

impl Default for CompositeEvents {
    fn default() -> Self {
        Self {
            before_add: Observers::new("beforeAdd"),
            after_add: Observers::new("afterAdd"),
            before_remove: Observers::new("beforeRemove"),
            after_remove: Observers::new("afterRemove"),
        }
    }
}

#[derive(Debug)]
pub struct World {
    pub bodies: Bodies,
    pub constraints: Constraints,
    pub composites: Composites,
    pub events: CompositeEvents,
    root: CompositeHandle,
    ids: IdAllocator,
    logger: Logger,
}

impl World {
    pub fn new(logger: Logger) -> Self {
        let mut ids = IdAllocator::new();
        let mut composites = Composites::new();
        let root = composites.create(&mut ids, "World");
        Self {
            bodies: Bodies::new(),
            constraints: Constraints::new(),
            composites,
            events: CompositeEvents::default(),
            root,
            ids,
            logger,
        }
    }

    pub fn root(&self) -> CompositeHandle {
        self.root
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub(crate) fn replace_ids(&mut self, ids: IdAllocator) {
        self.ids = ids;
    }

    pub fn is_modified(&self) -> bool {
        self.composites[self.root].is_modified
    }

    // === Factories ===

    pub fn create_body(&mut self, options: &BodyOptions) -> Result<BodyHandle, EngineError> {
        self.bodies.create(&mut self.ids, options)
    }

    pub fn create_constraint(&mut self, options: &ConstraintOptions) -> Result<ConstraintHandle, EngineError> {
        self.constraints.create(&mut self.ids, &self.bodies, options)
    }

    pub fn create_composite(&mut self, label: &str) -> CompositeHandle {
        self.composites.create(&mut self.ids, label)
    }

    // === Membership ===

    pub fn add(&mut self, composite: CompositeHandle, objects: &[Member]) {
        let source = EventSource::Composite(composite);
        self.events.before_add.trigger(source, CompositeEvent { objects: objects.to_vec() });

        for &object in objects.iter() {
            match object {
                Member::Body(body) => {
                    if self.bodies[body].is_part() {
                        self.logger
                            .warn("World::add: skipped adding a compound body part (add its parent instead)");
                        continue;
                    }
                    self.add_body(composite, body);
                }
                Member::Constraint(constraint) | Member::MouseConstraint(constraint) => {
                    self.add_constraint(composite, constraint)
                }
                Member::Composite(child) => self.add_composite(composite, child),
            }
        }

        self.events.after_add.trigger(source, CompositeEvent { objects: objects.to_vec() });
    }

    pub fn remove(&mut self, composite: CompositeHandle, objects: &[Member], deep: bool) {
        let source = EventSource::Composite(composite);
        self.events.before_remove.trigger(source, CompositeEvent { objects: objects.to_vec() });

        for &object in objects.iter() {
            match object {
                Member::Body(body) => self.remove_body(composite, body, deep),
                Member::Constraint(constraint) => self.remove_constraint(composite, constraint, deep),
                Member::MouseConstraint(constraint) => self.remove_constraint(composite, constraint, false),
                Member::Composite(child) => self.remove_composite(composite, child, deep),
            }
        }

        self.events.after_remove.trigger(source, CompositeEvent { objects: objects.to_vec() });
    }

    pub fn add_body(&mut self, composite: CompositeHandle, body: BodyHandle) {
        self.composites[composite].bodies.push(body);
        self.composites.set_modified(composite, true, true, false);
    }

    /// Detach a body. The body stays in the arena and keeps its handle.
    pub fn remove_body(&mut self, composite: CompositeHandle, body: BodyHandle, deep: bool) {
        if let Some(position) = self.composites[composite].bodies.iter().position(|b| *b == body) {
            self.composites[composite].bodies.remove(position);
            self.composites.set_modified(composite, true, true, false);
            self.bodies[body].sleep_counter = 0;
        }
        if deep {
            for child in self.composites[composite].composites.clone() {
                self.remove_body(child, body, true);
            }
        }
    }

    pub fn add_constraint(&mut self, composite: CompositeHandle, constraint: ConstraintHandle) {
        self.composites[composite].constraints.push(constraint);
        self.composites.set_modified(composite, true, true, false);
    }

    pub fn remove_constraint(&mut self, composite: CompositeHandle, constraint: ConstraintHandle, deep: bool) {
        if let Some(position) = self.composites[composite].constraints.iter().position(|c| *c == constraint) {
            self.composites[composite].constraints.remove(position);
            self.composites.set_modified(composite, true, true, false);
        }
        if deep {
            for child in self.composites[composite].composites.clone() {
                self.remove_constraint(child, constraint, true);
            }
        }
    }

    pub fn add_composite(&mut self, composite: CompositeHandle, child: CompositeHandle) {
        self.composites[composite].composites.push(child);
        self.composites[child].parent = Some(composite);
        self.composites.set_modified(composite, true, true, false);
    }

    pub fn remove_composite(&mut self, composite: CompositeHandle, child: CompositeHandle, deep: bool) {
        if let Some(position) = self.composites[composite].composites.iter().position(|c| *c == child) {
            let bodies = self.composites.all_bodies(child);
            self.composites[composite].composites.remove(position);
            self.composites[child].parent = None;
            self.composites.set_modified(composite, true, true, false);
            for body in bodies {
                self.bodies[body].sleep_counter = 0;
            }
        }
        if deep {
            for grandchild in self.composites[composite].composites.clone() {
                self.remove_composite(grandchild, child, true);
            }
        }
    }

    /// Empty a composite. `keep_static` leaves its static bodies in place;
    /// `deep` clears child composites first.
    pub fn clear(&mut self, composite: CompositeHandle, keep_static: bool, deep: bool) {
        if deep {
            for child in self.composites[composite].composites.clone() {
                self.clear(child, keep_static, true);
            }
        }

        if keep_static {
            let bodies = &self.bodies;
            self.composites[composite].bodies.retain(|b| bodies[*b].is_static);
        } else {
            self.composites[composite].bodies.clear();
        }
        self.composites[composite].constraints.clear();
        self.composites[composite].composites.clear();
        self.composites.set_modified(composite, true, true, false);
    }

    /// Remove `objects` from one composite and add them to another
    pub fn move_to(&mut self, from: CompositeHandle, objects: &[Member], to: CompositeHandle) {
        self.remove(from, objects, false);
        self.add(to, objects);
    }

    pub fn set_modified(&mut self, composite: CompositeHandle, is_modified: bool, update_parents: bool, update_children: bool) {
        self.composites
            .set_modified(composite, is_modified, update_parents, update_children);
    }

    // === Queries ===

    pub fn all_bodies(&mut self, composite: CompositeHandle) -> Vec<BodyHandle> {
        self.composites.all_bodies(composite)
    }

    pub fn all_constraints(&mut self, composite: CompositeHandle) -> Vec<ConstraintHandle> {
        self.composites.all_constraints(composite)
    }

    pub fn all_composites(&mut self, composite: CompositeHandle) -> Vec<CompositeHandle> {
        self.composites.all_composites(composite)
    }

    /// Find a member by id anywhere below `composite` (including itself for composites)
    pub fn get(&mut self, composite: CompositeHandle, id: u32, kind: MemberKind) -> Option<Member> {
        match kind {
            MemberKind::Body => self
                .all_bodies(composite)
                .into_iter()
                .find(|b| self.bodies[*b].id == id)
                .map(Member::Body),
            MemberKind::Constraint => self
                .all_constraints(composite)
                .into_iter()
                .find(|c| self.constraints[*c].id == id)
                .map(Member::Constraint),
            MemberKind::Composite => {
                let mut composites = self.all_composites(composite);
                composites.push(composite);
                composites
                    .into_iter()
                    .find(|c| self.composites[*c].id == id)
                    .map(Member::Composite)
            }
        }
    }

    /// Box around every body below `composite`, or `None` when it holds none
    pub fn bounds(&mut self, composite: CompositeHandle) -> Option<Bounds> {
        let bodies = self.all_bodies(composite);
        if bodies.is_empty() {
            return None;
        }
        let mut points = Vec::with_capacity(bodies.len() * 2);
        for body in bodies {
            points.push(self.bodies[body].bounds.min);
            points.push(self.bodies[body].bounds.max);
        }
        Some(Bounds::from_points(&points))
    }

    // === Bulk transforms ===

    fn members_to_move(&mut self, composite: CompositeHandle, recursive: bool) -> Vec<BodyHandle> {
        if recursive {
            self.all_bodies(composite)
        } else {
            self.composites[composite].bodies.clone()
        }
    }

    pub fn translate(&mut self, composite: CompositeHandle, translation: Vector, recursive: bool) {
        for body in self.members_to_move(composite, recursive) {
            self.bodies.translate(body, translation, false);
        }
    }

    /// Rotate every body about `point`, turning each by the same angle
    pub fn rotate(&mut self, composite: CompositeHandle, rotation: f64, point: Vector, recursive: bool) {
        for body in self.members_to_move(composite, recursive) {
            let position = self.bodies[body].position.rotate_about(rotation, point);
            self.bodies.set_position(body, position, false);
            self.bodies.rotate(body, rotation, None, false);
        }
    }

    pub fn scale(&mut self, composite: CompositeHandle, scale_x: f64, scale_y: f64, point: Vector, recursive: bool) {
        for body in self.members_to_move(composite, recursive) {
            let offset = self.bodies[body].position - point;
            let position = Vector::new(point.x + offset.x * scale_x, point.y + offset.y * scale_y);
            self.bodies.set_position(body, position, false);
            self.bodies.scale(body, scale_x, scale_y, None);
        }
    }

    /// Give every body, constraint and composite below `composite` a fresh id
    pub fn rebase(&mut self, composite: CompositeHandle) {
        for body in self.all_bodies(composite) {
            let id = self.ids.next_id();
            self.bodies.reassign_id(body, id);
        }
        for constraint in self.all_constraints(composite) {
            let id = self.ids.next_id();
            self.constraints.reassign_id(constraint, id);
        }
        for child in self.all_composites(composite) {
            let id = self.ids.next_id();
            self.composites.reassign_id(child, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::LogLevel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn world() -> World {
        World::new(Logger::new(LogLevel::None))
    }

    fn body(world: &mut World, x: f64, is_static: bool) -> BodyHandle {
        world
            .create_body(&BodyOptions {
                position: Vector::new(x, 0.0),
                is_static,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn add_and_remove_flag_modified_and_fire_events() {
        let mut world = world();
        let root = world.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let log = log.clone();
            world.events.before_add.on(move |e| log.borrow_mut().push((e.name, e.data.objects.len())));
        }
        {
            let log = log.clone();
            world.events.after_remove.on(move |e| log.borrow_mut().push((e.name, e.data.objects.len())));
        }

        let a = body(&mut world, 0.0, false);
        let b = body(&mut world, 100.0, false);
        world.add(root, &[Member::Body(a), Member::Body(b)]);
        assert!(world.is_modified());
        assert_eq!(world.all_bodies(root), vec![a, b]);

        world.set_modified(root, false, false, true);
        world.remove(root, &[Member::Body(a)], false);
        assert!(world.is_modified());
        assert_eq!(world.all_bodies(root), vec![b]);
        assert_eq!(*log.borrow(), vec![("beforeAdd", 2), ("afterRemove", 1)]);
    }

    #[test]
    fn compound_parts_are_skipped_with_a_warning() {
        let mut world = world();
        let root = world.root();
        let parent = world
            .create_body(&BodyOptions {
                parts: vec![BodyOptions::default(), BodyOptions {
                    position: Vector::new(40.0, 0.0),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .unwrap();
        let part = world.bodies[parent].parts[1];

        world.add(root, &[Member::Body(part)]);
        assert!(world.all_bodies(root).is_empty());
        assert_eq!(world.logger().warnings(), 1);

        world.add(root, &[Member::Body(parent)]);
        assert_eq!(world.all_bodies(root), vec![parent]);
    }

    #[test]
    fn nested_queries_and_deep_remove() {
        let mut world = world();
        let root = world.root();
        let stack = world.create_composite("stack");
        let a = body(&mut world, 0.0, false);
        let b = body(&mut world, 50.0, false);
        world.add(stack, &[Member::Body(a), Member::Body(b)]);
        world.add(root, &[Member::Composite(stack)]);

        assert_eq!(world.all_bodies(root), vec![a, b]);
        let b_id = world.bodies[b].id;
        assert_eq!(world.get(root, b_id, MemberKind::Body), Some(Member::Body(b)));
        let stack_id = world.composites[stack].id;
        assert_eq!(world.get(root, stack_id, MemberKind::Composite), Some(Member::Composite(stack)));
        let root_id = world.composites[root].id;
        assert_eq!(world.get(root, root_id, MemberKind::Composite), Some(Member::Composite(root)));

        world.bodies[b].sleep_counter = 7;
        world.remove(root, &[Member::Body(b)], true);
        assert_eq!(world.all_bodies(root), vec![a]);
        assert_eq!(world.bodies[b].sleep_counter, 0);
    }

    #[test]
    fn clear_keeps_static_bodies_when_asked() {
        let mut world = world();
        let root = world.root();
        let ground = body(&mut world, 0.0, true);
        let crate_ = body(&mut world, 0.0, false);
        world.add(root, &[Member::Body(ground), Member::Body(crate_)]);

        world.clear(root, true, false);
        assert_eq!(world.all_bodies(root), vec![ground]);
        world.clear(root, false, false);
        assert!(world.all_bodies(root).is_empty());
    }

    #[test]
    fn move_translate_and_bounds() {
        let mut world = world();
        let root = world.root();
        let other = world.create_composite("other");
        let a = body(&mut world, 0.0, false);
        world.add(root, &[Member::Body(a)]);

        world.move_to(root, &[Member::Body(a)], other);
        assert!(world.all_bodies(root).is_empty());
        assert_eq!(world.all_bodies(other), vec![a]);

        world.translate(other, Vector::new(10.0, 5.0), true);
        let bounds = world.bounds(other).unwrap();
        assert!((bounds.min.x - -10.0).abs() < 1e-9);
        assert!((bounds.max.y - 25.0).abs() < 1e-9);
        assert!(world.bounds(root).is_none());

        world.rotate(other, std::f64::consts::PI, Vector::ZERO, true);
        assert!((world.bodies[a].position.x + 10.0).abs() < 1e-9);

        world.scale(other, 2.0, 2.0, Vector::ZERO, true);
        assert!((world.bodies[a].position.x + 20.0).abs() < 1e-9);
        assert!((world.bodies[a].area - 6400.0).abs() < 1e-6);
    }

    #[test]
    fn rebase_assigns_fresh_ids() {
        let mut world = world();
        let root = world.root();
        let a = body(&mut world, 0.0, false);
        world.add(root, &[Member::Body(a)]);
        let old = world.bodies[a].id;

        world.rebase(root);
        let new = world.bodies[a].id;
        assert!(new > old);
        assert_eq!(world.bodies.find(new), Some(a));
        assert_eq!(world.bodies.find(old), None);
    }
}
