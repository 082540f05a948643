//! Entities - the single kind of object in the system
//!
//! An entity is a bag of optional capabilities: named slots (some marked as
//! parents), a message sequence, a scalar payload and a native operation.
//! Which of these are present decides how the entity evaluates.

use crate::error::Result;
use crate::message::Message;
use crate::value::Scalar;
use crate::world::World;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Stable handle of an entity inside its [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) fn from_index(index: usize) -> Self {
        // Saturates so an out-of-range index stays an invalid handle.
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of this entity in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type NativeBody = dyn Fn(&mut World, EntityId) -> Result<EntityId>;

/// A primitive callback shared by every entity (and clone) that carries it
///
/// The body receives the activation and reads `self` / `parameter` off its
/// slots. It returns a new or cloned entity, or the receiver when that is the
/// intended answer, but never the activation itself.
#[derive(Clone)]
pub struct NativeOperation {
    name: Rc<str>,
    body: Rc<NativeBody>,
}

impl NativeOperation {
    pub fn new(
        name: impl Into<Rc<str>>,
        body: impl Fn(&mut World, EntityId) -> Result<EntityId> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether both refer to the same callback
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }

    pub(crate) fn invoke(&self, world: &mut World, activation: EntityId) -> Result<EntityId> {
        (self.body)(world, activation)
    }
}

impl fmt::Debug for NativeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeOperation({})", self.name)
    }
}

/// How an entity evaluates, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalKind {
    /// Carries a message sequence (method or block body)
    Method,
    /// Carries a native operation
    Primitive,
    /// Carries only a scalar value
    Scalar,
    /// Plain data; evaluates to itself
    Plain,
}

impl EvalKind {
    /// Methods and primitives run code when sent; the rest is passive data
    pub fn is_executable(self) -> bool {
        matches!(self, Self::Method | Self::Primitive)
    }
}

/// An object: slots, parent marks and optional behavior
///
/// Built with the `with_*` methods and handed to [`World::create`]. Parent
/// marks can only be added together with their slot, so every parent name is
/// always a slot name.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub(crate) slots: IndexMap<String, EntityId>,
    pub(crate) parent_names: IndexSet<String>,
    pub(crate) message_sequence: Option<Vec<Message>>,
    pub(crate) scalar_value: Option<Scalar>,
    pub(crate) native_operation: Option<NativeOperation>,
}

impl Entity {
    /// An empty plain entity
    pub fn new() -> Self {
        Self::default()
    }

    /// An entity carrying only a scalar
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        Self::new().with_scalar(value)
    }

    /// An entity carrying only a native operation
    pub fn native(operation: NativeOperation) -> Self {
        Self::new().with_native(operation)
    }

    /// An entity carrying only a message sequence
    pub fn method(messages: Vec<Message>) -> Self {
        Self::new().with_messages(messages)
    }

    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, value: EntityId) -> Self {
        self.slots.insert(name.into(), value);
        self
    }

    /// Add a slot and mark it as a parent in one step
    #[must_use]
    pub fn with_parent(mut self, name: impl Into<String>, value: EntityId) -> Self {
        let name = name.into();
        self.slots.insert(name.clone(), value);
        self.parent_names.insert(name);
        self
    }

    #[must_use]
    pub fn with_scalar(mut self, value: impl Into<Scalar>) -> Self {
        self.scalar_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.message_sequence = Some(messages);
        self
    }

    #[must_use]
    pub fn with_native(mut self, operation: NativeOperation) -> Self {
        self.native_operation = Some(operation);
        self
    }

    /// Value of an own slot
    pub fn slot(&self, name: &str) -> Option<EntityId> {
        self.slots.get(name).copied()
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Own slots in insertion order
    pub fn slots(&self) -> impl Iterator<Item = (&str, EntityId)> + '_ {
        self.slots.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_parent(&self, name: &str) -> bool {
        self.parent_names.contains(name)
    }

    /// Parent slot names in attachment order
    pub fn parent_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parent_names.iter().map(String::as_str)
    }

    /// Parent slots as `(name, value)` pairs in attachment order
    pub fn parents(&self) -> impl Iterator<Item = (&str, EntityId)> + '_ {
        self.parent_names
            .iter()
            .filter_map(|name| self.slots.get(name).map(|id| (name.as_str(), *id)))
    }

    pub fn message_sequence(&self) -> Option<&[Message]> {
        self.message_sequence.as_deref()
    }

    pub fn scalar_value(&self) -> Option<&Scalar> {
        self.scalar_value.as_ref()
    }

    pub fn native_operation(&self) -> Option<&NativeOperation> {
        self.native_operation.as_ref()
    }

    /// Classify by populated fields: message sequence, then native operation,
    /// then scalar, then plain
    pub fn eval_kind(&self) -> EvalKind {
        if self.message_sequence.is_some() {
            EvalKind::Method
        } else if self.native_operation.is_some() {
            EvalKind::Primitive
        } else if self.scalar_value.is_some() {
            EvalKind::Scalar
        } else {
            EvalKind::Plain
        }
    }
}
