//! Error types for the object engine
//!
//! Failures are plain values: a caller that wants "try, else fallback"
//! branches on the variant instead of intercepting anything.

use crate::entity::EntityId;
use thiserror::Error;

/// Everything a core operation or a primitive body can fail with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// No reachable entity defines the requested slot
    #[error("slot '{name}' not found")]
    SlotNotFound {
        /// The name that was looked up
        name: String,
    },

    /// `mark_as_parent` named a slot that does not exist
    #[error("cannot mark '{name}' as parent: no such slot")]
    UnknownSlot {
        /// The name that was supposed to become a parent
        name: String,
    },

    /// A handle that was not issued by this world
    #[error("entity {0} does not belong to this world")]
    InvalidEntity(EntityId),

    /// Nested sends went deeper than `WorldConfig::max_send_depth`
    #[error("send depth limit of {limit} exceeded")]
    SendDepthExceeded {
        /// The configured limit
        limit: usize,
    },

    /// A primitive received data of the wrong shape
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the primitive needed
        expected: &'static str,
        /// What it got instead
        found: String,
    },

    /// A primitive body failed for its own reasons
    #[error("primitive '{selector}' failed: {message}")]
    Primitive {
        /// Name of the failing primitive
        selector: String,
        /// Human-readable cause
        message: String,
    },
}

impl ObjectError {
    pub fn slot_not_found(name: impl Into<String>) -> Self {
        Self::SlotNotFound { name: name.into() }
    }

    pub fn unknown_slot(name: impl Into<String>) -> Self {
        Self::UnknownSlot { name: name.into() }
    }

    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }

    pub fn primitive(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Primitive {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// True for `SlotNotFound`, the one failure callers routinely recover from
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SlotNotFound { .. })
    }
}

/// Result alias used across the engine and by primitive bodies
pub type Result<T, E = ObjectError> = std::result::Result<T, E>;
