//! Diagnostic views of the object graph
//!
//! [`World::inspect`] builds a tree of everything reachable from an entity.
//! An entity that shows up a second time becomes a `Seen` placeholder, so
//! cyclic graphs render finitely. Entities nested deeper than
//! `WorldConfig::max_inspect_depth` become `Truncated`, which keeps long
//! chains off the host stack. The tree prints as indented text and
//! serializes to JSON.

use crate::entity::{EntityId, EvalKind};
use crate::error::Result;
use crate::value::Scalar;
use crate::world::World;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Rendering of one entity and everything below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inspection {
    Entity {
        id: EntityId,
        #[serde(skip_serializing_if = "Option::is_none")]
        scalar: Option<Scalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        native: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        messages: Option<Vec<InspectedMessage>>,
        slots: Vec<InspectedSlot>,
    },
    /// Already rendered elsewhere in the tree
    Seen { id: EntityId },
    /// Below the inspection depth limit; not expanded
    Truncated { id: EntityId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectedSlot {
    pub name: String,
    pub parent: bool,
    pub value: Inspection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectedMessage {
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<Inspection>,
}

impl Inspection {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Entity { id, .. } | Self::Seen { id } | Self::Truncated { id } => *id,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let (id, scalar, native, messages, slots) = match self {
            Self::Entity {
                id,
                scalar,
                native,
                messages,
                slots,
            } => (id, scalar, native, messages, slots),
            Self::Seen { id } => return writeln!(f, "{id} ..."),
            Self::Truncated { id } => return writeln!(f, "{id} (truncated)"),
        };

        write!(f, "{id}")?;
        if let Some(scalar) = scalar {
            write!(f, " = {scalar}")?;
        }
        if let Some(native) = native {
            write!(f, " <native {native}>")?;
        }
        writeln!(f)?;

        let pad = "  ".repeat(depth + 1);
        for message in messages.iter().flatten() {
            write!(f, "{pad}> {}", message.selector)?;
            match &message.argument {
                Some(argument) => {
                    write!(f, " ")?;
                    argument.render(f, depth + 1)?;
                }
                None => writeln!(f)?,
            }
        }
        for slot in slots {
            let marker = if slot.parent { "*" } else { "" };
            write!(f, "{pad}{}{marker}: ", slot.name)?;
            slot.value.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl World {
    /// Tree view of everything reachable from `root`
    pub fn inspect(&self, root: EntityId) -> Result<Inspection> {
        let mut visited = HashSet::new();
        self.inspect_node(root, 0, &mut visited)
    }

    fn inspect_node(
        &self,
        id: EntityId,
        depth: usize,
        visited: &mut HashSet<EntityId>,
    ) -> Result<Inspection> {
        let entity = self.entity(id)?;
        if depth >= self.config.max_inspect_depth {
            return Ok(Inspection::Truncated { id });
        }
        if !visited.insert(id) {
            return Ok(Inspection::Seen { id });
        }

        let messages = match entity.message_sequence() {
            Some(sequence) => {
                let mut inspected = Vec::with_capacity(sequence.len());
                for message in sequence {
                    let argument = match message.argument {
                        Some(argument) => Some(self.inspect_node(argument, depth + 1, visited)?),
                        None => None,
                    };
                    inspected.push(InspectedMessage {
                        selector: message.selector.clone(),
                        argument,
                    });
                }
                Some(inspected)
            }
            None => None,
        };

        let mut slots = Vec::with_capacity(entity.slot_count());
        for (name, value) in entity.slots() {
            slots.push(InspectedSlot {
                name: name.to_string(),
                parent: entity.is_parent(name),
                value: self.inspect_node(value, depth + 1, visited)?,
            });
        }

        Ok(Inspection::Entity {
            id,
            scalar: entity.scalar_value().cloned(),
            native: entity.native_operation().map(|op| op.name().to_string()),
            messages,
            slots,
        })
    }

    /// One-line summary used by printing primitives
    pub fn describe(&self, id: EntityId) -> Result<String> {
        let entity = self.entity(id)?;
        Ok(match entity.eval_kind() {
            EvalKind::Method => format!("<method {id}>"),
            EvalKind::Primitive => match entity.native_operation() {
                Some(op) => format!("<primitive {}>", op.name()),
                None => format!("<primitive {id}>"),
            },
            EvalKind::Scalar => match entity.scalar_value() {
                Some(scalar) => scalar.to_string(),
                None => format!("<object {id}>"),
            },
            EvalKind::Plain => format!("<object {id}>"),
        })
    }
}
