//! The entity arena and the slot mutation operations
//!
//! Entities refer to each other through [`EntityId`] handles, so shared and
//! cyclic structure needs no ownership bookkeeping. Entities are never freed;
//! a world lives as long as the object graph it hosts.
//!
//! Memory only grows. Every send clones its slot value, and a clone follows
//! parent links, so reading a data slot of an object whose parents reach the
//! lobby copies that whole graph. The copy is detached from the live traits:
//! slots added to a traits object later are not seen through it.

use crate::config::WorldConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{ObjectError, Result};
use crate::value::Scalar;
use tracing::debug;

/// Name of the slot bound to the receiver in every activation
pub const SELF_SLOT: &str = "self";

/// Name of the slot bound to the argument of a parameterized send
pub const PARAMETER_SLOT: &str = "parameter";

/// Arena owning every entity of one object graph
///
/// Nothing is reclaimed while the world is alive; drop the world to release
/// its entities.
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Entity>,
    pub(crate) config: WorldConfig,
    pub(crate) depth: usize,
}

impl World {
    /// Create an empty world with the default configuration
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            entities: Vec::with_capacity(config.initial_capacity),
            config,
            depth: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of entities ever created in this world
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `id` was issued by this world
    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.entities.len()
    }

    /// Move an entity into the arena and hand back its handle
    pub fn create(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::from_index(self.entities.len());
        self.entities.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id.index())
            .ok_or(ObjectError::InvalidEntity(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id.index())
            .ok_or(ObjectError::InvalidEntity(id))
    }

    /// Value of an own slot of `id`, without consulting parents
    pub fn slot(&self, id: EntityId, name: &str) -> Result<Option<EntityId>> {
        Ok(self.entity(id)?.slot(name))
    }

    pub fn scalar(&self, id: EntityId) -> Result<Option<&Scalar>> {
        Ok(self.entity(id)?.scalar_value())
    }

    /// The receiver bound into an activation
    pub fn receiver(&self, activation: EntityId) -> Result<EntityId> {
        self.slot(activation, SELF_SLOT)?
            .ok_or_else(|| ObjectError::slot_not_found(SELF_SLOT))
    }

    /// The argument bound into an activation of a parameterized send
    pub fn argument(&self, activation: EntityId) -> Result<EntityId> {
        self.slot(activation, PARAMETER_SLOT)?
            .ok_or_else(|| ObjectError::slot_not_found(PARAMETER_SLOT))
    }

    /// Insert or overwrite `entity.name = value`
    ///
    /// Overwriting a parent slot keeps its parent mark.
    pub fn assign_slot(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        value: EntityId,
    ) -> Result<()> {
        self.check(value)?;
        let name = name.into();
        debug!(%entity, slot = %name, %value, "assign slot");
        self.entity_mut(entity)?.slots.insert(name, value);
        Ok(())
    }

    /// Mark an existing slot as a parent
    ///
    /// Fails with `UnknownSlot`, leaving the entity untouched, when the slot
    /// does not exist. Marking twice is a no-op.
    pub fn mark_as_parent(&mut self, entity: EntityId, name: &str) -> Result<()> {
        let target = self.entity_mut(entity)?;
        if !target.slots.contains_key(name) {
            return Err(ObjectError::unknown_slot(name));
        }
        if target.parent_names.insert(name.to_string()) {
            debug!(%entity, slot = name, "mark as parent");
        }
        Ok(())
    }

    /// `assign_slot` followed by `mark_as_parent`, failing before either
    /// takes effect
    pub fn assign_parent_slot(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        value: EntityId,
    ) -> Result<()> {
        self.check(entity)?;
        let name = name.into();
        self.assign_slot(entity, name.clone(), value)?;
        self.mark_as_parent(entity, &name)
    }

    fn check(&self, id: EntityId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ObjectError::InvalidEntity(id))
        }
    }

    /// Drop every entity created at or after `len`; used to undo the
    /// allocations of a failed clone
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entities.truncate(len);
    }
}
