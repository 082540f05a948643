//! Breadth-first slot lookup through parent links
//!
//! Parents are visited level by level, each level in attachment order, so a
//! name defined by any direct parent shadows the same name defined only by a
//! grandparent. A visited set keeps cyclic parent graphs finite.

use crate::entity::EntityId;
use crate::error::{ObjectError, Result};
use crate::world::World;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

impl World {
    /// Find the entity nearest to `receiver` that owns a slot called `name`
    pub fn lookup(&self, receiver: EntityId, name: &str) -> Result<EntityId> {
        let mut visited = HashSet::from([receiver]);
        let mut frontier = VecDeque::from([receiver]);

        while let Some(current) = frontier.pop_front() {
            let entity = self.entity(current)?;
            if entity.has_slot(name) {
                trace!(%receiver, %current, slot = name, "lookup hit");
                return Ok(current);
            }

            for (_, parent) in entity.parents() {
                if visited.insert(parent) {
                    frontier.push_back(parent);
                }
            }
        }

        trace!(%receiver, slot = name, visited = visited.len(), "lookup miss");
        Err(ObjectError::slot_not_found(name))
    }

    /// Resolve `name` to the slot value it denotes for `receiver`
    pub fn lookup_slot(&self, receiver: EntityId, name: &str) -> Result<EntityId> {
        let owner = self.lookup(receiver, name)?;
        self.slot(owner, name)?
            .ok_or_else(|| ObjectError::slot_not_found(name))
    }

    /// Whether a send of `name` to `receiver` would find a slot
    pub fn responds_to(&self, receiver: EntityId, name: &str) -> bool {
        self.lookup(receiver, name).is_ok()
    }
}
