//! The starter object graph
//!
//! Builds a lobby, traits objects for numbers, booleans, strings and points,
//! the two boolean objects and a point prototype, all with ordinary engine
//! operations. The lobby is the root every traits object inherits from and
//! names every prototype in its slots.

use crate::primitives::{self, Anchors, Transcript};
use proteus_core::{Entity, EntityId, Message, NativeOperation, Result, World};
use tracing::debug;

/// Well-known handles into a bootstrapped world
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub lobby: EntityId,
    pub number_traits: EntityId,
    pub boolean_traits: EntityId,
    pub string_traits: EntityId,
    pub point_traits: EntityId,
    pub truth: EntityId,
    pub falsehood: EntityId,
    pub point: EntityId,
    transcript: Transcript,
}

impl Bootstrap {
    /// Populate `world` with the starter graph
    pub fn install(world: &mut World, transcript: Transcript) -> Result<Self> {
        let lobby = world.create(Entity::new());
        let number_traits = traits_object(world, lobby);
        let boolean_traits = traits_object(world, lobby);
        let string_traits = traits_object(world, lobby);
        let point_traits = traits_object(world, lobby);

        let truth = world.create(Entity::scalar(true).with_parent("parent", boolean_traits));
        let falsehood = world.create(Entity::scalar(false).with_parent("parent", boolean_traits));
        let anchors = Anchors {
            truth,
            falsehood,
            number_traits,
            string_traits,
        };

        define(world, lobby, primitives::clone_message())?;
        define(world, lobby, primitives::print(transcript.clone()))?;
        define(world, lobby, primitives::print_string(anchors))?;
        define(world, lobby, primitives::identical(anchors))?;

        define(world, number_traits, primitives::add())?;
        define(world, number_traits, primitives::subtract())?;
        define(world, number_traits, primitives::multiply())?;
        define(world, number_traits, primitives::divide())?;
        define(world, number_traits, primitives::less_than(anchors))?;
        define(world, number_traits, primitives::greater_than(anchors))?;
        define(world, number_traits, primitives::equal(anchors))?;

        define(world, boolean_traits, primitives::not(anchors))?;
        define(world, boolean_traits, primitives::and(anchors))?;
        define(world, boolean_traits, primitives::or(anchors))?;
        define(world, boolean_traits, primitives::if_true())?;
        define(world, boolean_traits, primitives::if_false())?;

        define(world, string_traits, primitives::concat())?;
        define(world, string_traits, primitives::size(anchors))?;

        define(world, point_traits, primitives::setter("x:", "x"))?;
        define(world, point_traits, primitives::setter("y:", "y"))?;
        define(world, point_traits, primitives::point_add())?;

        let zero = world.create(Entity::scalar(0).with_parent("parent", number_traits));
        let empty = world.create(Entity::scalar("").with_parent("parent", string_traits));
        let point = world.create(
            Entity::new()
                .with_parent("parent", point_traits)
                .with_slot("x", zero)
                .with_slot("y", zero),
        );

        world.assign_slot(lobby, "lobby", lobby)?;
        world.assign_slot(lobby, "true", truth)?;
        world.assign_slot(lobby, "false", falsehood)?;
        world.assign_slot(lobby, "number", zero)?;
        world.assign_slot(lobby, "string", empty)?;
        world.assign_slot(lobby, "point", point)?;

        debug!(%lobby, entities = world.len(), "bootstrap installed");
        Ok(Self {
            lobby,
            number_traits,
            boolean_traits,
            string_traits,
            point_traits,
            truth,
            falsehood,
            point,
            transcript,
        })
    }

    /// Everything `print` has written so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn number(&self, world: &mut World, value: i64) -> EntityId {
        world.create(Entity::scalar(value).with_parent("parent", self.number_traits))
    }

    pub fn float(&self, world: &mut World, value: f64) -> EntityId {
        world.create(Entity::scalar(value).with_parent("parent", self.number_traits))
    }

    pub fn string(&self, world: &mut World, value: &str) -> EntityId {
        world.create(Entity::scalar(value).with_parent("parent", self.string_traits))
    }

    pub fn boolean(&self, value: bool) -> EntityId {
        if value {
            self.truth
        } else {
            self.falsehood
        }
    }

    /// A new point inheriting from the point traits
    pub fn point(&self, world: &mut World, x: i64, y: i64) -> EntityId {
        let x = self.number(world, x);
        let y = self.number(world, y);
        world.create(
            Entity::new()
                .with_parent("parent", self.point_traits)
                .with_slot("x", x)
                .with_slot("y", y),
        )
    }

    /// A block: a message sequence that inherits from the lobby
    pub fn block(&self, world: &mut World, messages: Vec<Message>) -> EntityId {
        world.create(Entity::method(messages).with_parent("parent", self.lobby))
    }

    /// A method whose body sees the receiver's slots through its `self`
    /// parent; the placeholder is replaced by the receiver on every send
    pub fn method(&self, world: &mut World, messages: Vec<Message>) -> EntityId {
        let placeholder = world.create(Entity::new());
        world.create(Entity::method(messages).with_parent("self", placeholder))
    }
}

fn traits_object(world: &mut World, lobby: EntityId) -> EntityId {
    world.create(Entity::new().with_parent("parent", lobby))
}

/// Install a primitive under its own name
fn define(world: &mut World, holder: EntityId, operation: NativeOperation) -> Result<()> {
    let name = operation.name().to_string();
    let method = world.create(Entity::native(operation));
    world.assign_slot(holder, name, method)
}
