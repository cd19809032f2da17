//! Pairs - the table of colliding part pairs that persists across steps
//!
//! Each update sorts the incoming collisions into started, still active and
//! ended pairs. A pair that stopped colliding is dropped at once unless one
//! of its bodies sleeps, so contacts between sleeping bodies keep their
//! warm-start impulses.

mod pair;

pub use pair::{Contact, ContactId, Pair, VertexRef};

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::body::Bodies;
use crate::systems::collision::Collision;

/// Identity of a pair: the two part ids, lower first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PairId {
    pub a: u32,
    pub b: u32,
}

impl PairId {
    pub fn new(id_a: u32, id_b: u32) -> Self {
        if id_a < id_b {
            Self { a: id_a, b: id_b }
        } else {
            Self { a: id_b, b: id_a }
        }
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}B{}", self.a, self.b)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Pairs {
    list: Vec<Pair>,
    table: HashMap<PairId, usize>,
    pub collision_start: Vec<PairId>,
    pub collision_active: Vec<PairId>,
    /// Snapshots of pairs that stopped touching this step
    pub collision_end: Vec<Pair>,
}

impl Pairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn list(&self) -> &[Pair] {
        &self.list
    }

    pub(crate) fn list_mut(&mut self) -> &mut [Pair] {
        &mut self.list
    }

    pub fn get(&self, id: PairId) -> Option<&Pair> {
        self.table.get(&id).map(|&i| &self.list[i])
    }

    pub fn active_contact_count(&self) -> usize {
        self.list.iter().map(|p| p.active_contacts.len()).sum()
    }

    pub fn update(&mut self, collisions: Vec<Collision>, bodies: &Bodies, timestamp: f64) {
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();

        for pair in self.list.iter_mut() {
            pair.confirmed_active = false;
        }

        for collision in collisions {
            let id = PairId::new(bodies[collision.body_a].id, bodies[collision.body_b].id);
            match self.table.get(&id) {
                Some(&index) => {
                    let pair = &mut self.list[index];
                    if pair.is_active {
                        self.collision_active.push(id);
                    } else {
                        self.collision_start.push(id);
                    }
                    pair.update(collision, bodies, timestamp);
                    pair.confirmed_active = true;
                }
                None => {
                    let pair = Pair::create(collision, bodies, timestamp);
                    self.table.insert(id, self.list.len());
                    self.list.push(pair);
                    self.collision_start.push(id);
                }
            }
        }

        let mut removed = false;
        let collision_end = &mut self.collision_end;
        self.list.retain_mut(|pair| {
            if pair.confirmed_active {
                return true;
            }
            if pair.is_active {
                pair.set_active(false, timestamp);
                collision_end.push(pair.clone());
            }
            let parent_a = &bodies[pair.collision.parent_a];
            let parent_b = &bodies[pair.collision.parent_b];
            let keep = parent_a.is_sleeping || parent_b.is_sleeping;
            removed |= !keep;
            keep
        });

        if removed {
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.table.clear();
        for (index, pair) in self.list.iter().enumerate() {
            self.table.insert(pair.id, index);
        }
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.table.clear();
        self.collision_start.clear();
        self.collision_active.clear();
        self.collision_end.clear();
    }
}
