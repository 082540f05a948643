//! Cycle-safe deep clone
//!
//! Every entity reachable from the root, through slots and through the
//! argument entities of message sequences, is duplicated exactly once. The
//! duplicate of an entity is allocated the first time it is reached and
//! recorded before its references are followed, so cycles and shared
//! structure resolve to the existing duplicate.

use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::message::Message;
use crate::world::World;
use std::collections::HashMap;
use tracing::debug;

/// Original-to-duplicate mapping of one clone operation
struct CloneMap {
    copies: HashMap<EntityId, EntityId>,
    pending: Vec<EntityId>,
}

impl CloneMap {
    fn new() -> Self {
        Self {
            copies: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Duplicate handle for `original`, allocating an empty cell on first
    /// sight and queueing the original for copying
    fn reserve(&mut self, world: &mut World, original: EntityId) -> Result<EntityId> {
        if let Some(&copy) = self.copies.get(&original) {
            return Ok(copy);
        }
        world.entity(original)?;
        let copy = world.create(Entity::new());
        self.copies.insert(original, copy);
        self.pending.push(original);
        Ok(copy)
    }
}

impl World {
    /// Deep-copy the graph reachable from `root` and return the new root
    ///
    /// Scalars are copied, native operations are shared, parent marks are
    /// duplicated over the same names. On failure nothing is left behind.
    pub fn clone_entity(&mut self, root: EntityId) -> Result<EntityId> {
        let mark = self.len();
        let result = self.clone_graph(root);
        if result.is_err() {
            self.truncate(mark);
        }
        result
    }

    fn clone_graph(&mut self, root: EntityId) -> Result<EntityId> {
        let mut map = CloneMap::new();
        let root_copy = map.reserve(self, root)?;

        while let Some(original) = map.pending.pop() {
            let source = self.entity(original)?.clone();

            let mut copy = Entity {
                slots: Default::default(),
                parent_names: source.parent_names,
                message_sequence: None,
                scalar_value: source.scalar_value,
                native_operation: source.native_operation,
            };
            for (name, target) in source.slots {
                let target = map.reserve(self, target)?;
                copy.slots.insert(name, target);
            }
            if let Some(messages) = source.message_sequence {
                let mut rewired = Vec::with_capacity(messages.len());
                for message in messages {
                    let argument = match message.argument {
                        Some(argument) => Some(map.reserve(self, argument)?),
                        None => None,
                    };
                    rewired.push(Message {
                        selector: message.selector,
                        argument,
                    });
                }
                copy.message_sequence = Some(rewired);
            }

            let target = map.copies[&original];
            *self.entity_mut(target)? = copy;
        }

        debug!(%root, copy = %root_copy, entities = map.copies.len(), "clone");
        Ok(root_copy)
    }
}
