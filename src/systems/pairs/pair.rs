//! Pair - persistent record of two parts in contact
//!
//! Contacts are cached per vertex slot so their accumulated impulses carry
//! over from one step to the next (warm starting).

use serde::Serialize;

use crate::core::ids::BodyHandle;
use crate::core::math::Vector;
use crate::domain::body::Bodies;
use crate::systems::collision::Collision;

use super::PairId;

/// Vertex slot within a pair: the index on parent A, or offset past
/// parent A's vertex count for the other body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ContactId(pub usize);

/// Points at a live vertex of a body or part
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VertexRef {
    pub body: BodyHandle,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub vertex: VertexRef,
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
}

impl Contact {
    /// Current world position of the contact vertex
    #[inline]
    pub fn point(&self, bodies: &Bodies) -> Vector {
        bodies[self.vertex.body].vertices[self.vertex.index].point()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub id: PairId,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub collision: Collision,
    pub contacts: Vec<Contact>,
    /// Indices into `contacts` touched by the latest collision
    pub active_contacts: Vec<usize>,
    pub separation: f64,
    pub is_active: bool,
    pub confirmed_active: bool,
    pub is_sensor: bool,
    pub time_created: f64,
    pub time_updated: f64,

    // Combined material of the two parents
    pub inverse_mass: f64,
    pub friction: f64,
    pub friction_static: f64,
    pub restitution: f64,
    pub slop: f64,
}

impl Pair {
    pub fn create(collision: Collision, bodies: &Bodies, timestamp: f64) -> Self {
        let (a, b) = (collision.body_a, collision.body_b);
        let mut pair = Self {
            id: PairId::new(bodies[a].id, bodies[b].id),
            body_a: a,
            body_b: b,
            contacts: Vec::new(),
            active_contacts: Vec::new(),
            separation: 0.0,
            is_active: true,
            confirmed_active: true,
            is_sensor: bodies[a].is_sensor || bodies[b].is_sensor,
            time_created: timestamp,
            time_updated: timestamp,
            inverse_mass: 0.0,
            friction: 0.0,
            friction_static: 0.0,
            restitution: 0.0,
            slop: 0.0,
            collision: collision.clone(),
        };
        pair.update(collision, bodies, timestamp);
        pair
    }

    /// Take a fresh collision for this pair: refresh material and the active
    /// contact set, reusing cached contacts by slot.
    pub fn update(&mut self, collision: Collision, bodies: &Bodies, timestamp: f64) {
        let parent_a = &bodies[collision.parent_a];
        let parent_b = &bodies[collision.parent_b];

        self.separation = collision.depth;
        self.inverse_mass = parent_a.inverse_mass + parent_b.inverse_mass;
        self.friction = parent_a.friction.min(parent_b.friction);
        self.friction_static = parent_a.friction_static.max(parent_b.friction_static);
        self.restitution = parent_a.restitution.max(parent_b.restitution);
        self.slop = parent_a.slop.max(parent_b.slop);

        // supports belong to the colliding parts, not the parents
        let part_a_len = bodies[collision.body_a].vertices.len();
        self.active_contacts.clear();
        for support in collision.supports.iter() {
            let id = if support.body == collision.body_a {
                ContactId(support.index)
            } else {
                ContactId(part_a_len + support.index)
            };

            let slot = match self.contacts.iter().position(|c| c.id == id) {
                Some(slot) => slot,
                None => {
                    self.contacts.push(Contact {
                        id,
                        vertex: VertexRef {
                            body: support.body,
                            index: support.index,
                        },
                        normal_impulse: 0.0,
                        tangent_impulse: 0.0,
                    });
                    self.contacts.len() - 1
                }
            };
            self.active_contacts.push(slot);
        }

        self.collision = collision;
        self.set_active(true, timestamp);
    }

    pub fn set_active(&mut self, is_active: bool, timestamp: f64) {
        if is_active {
            self.is_active = true;
            self.time_updated = timestamp;
        } else {
            self.is_active = false;
            self.active_contacts.clear();
        }
    }

    pub fn active_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.active_contacts.iter().map(move |&i| &self.contacts[i])
    }

    /// World positions of the active contacts
    pub fn active_contact_points(&self, bodies: &Bodies) -> Vec<Vector> {
        self.active_contacts().map(|c| c.point(bodies)).collect()
    }
}
