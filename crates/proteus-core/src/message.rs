//! Message descriptors - the statements of a method body
//!
//! A method or block is a flat list of messages sent, in order, to its own
//! activation. Each message names a selector and may carry an entity that
//! produces the argument when evaluated.

use crate::entity::EntityId;
use std::fmt;

/// One step of a message sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    /// Slot name to send
    pub selector: String,

    /// Entity evaluated to produce the argument, for parameterized sends
    pub argument: Option<EntityId>,
}

impl Message {
    /// A unary message: `activation selector`
    pub fn unary(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            argument: None,
        }
    }

    /// A parameterized message: `activation selector argument`
    pub fn with_argument(selector: impl Into<String>, argument: EntityId) -> Self {
        Self {
            selector: selector.into(),
            argument: Some(argument),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument {
            Some(argument) => write!(f, "{} {argument}", self.selector),
            None => write!(f, "{}", self.selector),
        }
    }
}

/// Shorthand for building messages
///
/// `msg!(print)` and `msg!("print")` are unary; `msg!("+", five)` carries an
/// argument-producing entity.
#[macro_export]
macro_rules! msg {
    ($selector:literal, $argument:expr) => {
        $crate::message::Message::with_argument($selector, $argument)
    };

    ($selector:literal) => {
        $crate::message::Message::unary($selector)
    };

    ($selector:ident) => {
        $crate::message::Message::unary(stringify!($selector))
    };
}
