//! Proteus Standard Library
//!
//! Collaborators of the object engine, built only on its public operations:
//! - Primitive bodies for numbers, booleans, strings and points
//! - A bootstrap that builds the lobby and the starter prototypes

pub mod bootstrap;
pub mod primitives;

pub use bootstrap::Bootstrap;
pub use primitives::{Anchors, Transcript};
