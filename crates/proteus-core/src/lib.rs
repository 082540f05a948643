//! Proteus Core
//!
//! A prototype-based object engine with slot-and-message semantics:
//! - Entities hold named slots; some slots are parents for inheritance
//! - Breadth-first, cycle-safe lookup across multiple parents
//! - Sends clone the found slot value into an activation and evaluate it
//! - Cycle-safe deep clone is the only way to make new objects from old ones

pub mod clone;
pub mod config;
pub mod entity;
pub mod error;
pub mod inspect;
pub mod lookup;
pub mod message;
pub mod send;
pub mod value;
pub mod world;

pub use config::WorldConfig;
pub use entity::{Entity, EntityId, EvalKind, NativeOperation};
pub use error::{ObjectError, Result};
pub use inspect::{InspectedMessage, InspectedSlot, Inspection};
pub use message::Message;
pub use value::Scalar;
pub use world::{World, PARAMETER_SLOT, SELF_SLOT};
