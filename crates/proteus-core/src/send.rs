//! Evaluation and the message-send protocol
//!
//! A send looks the selector up, clones the slot value into a private
//! activation, binds `self` (and `parameter`) into it and evaluates it.
//! Evaluation is decided by [`EvalKind`]: message sequences run against their
//! activation, native operations are called with it, scalars evaluate to a
//! fresh copy and plain entities to themselves.

use crate::entity::{EntityId, EvalKind};
use crate::error::{ObjectError, Result};
use crate::world::{World, PARAMETER_SLOT, SELF_SLOT};
use tracing::{debug, trace, warn};

impl World {
    /// Unary send: `receiver selector`
    pub fn send(&mut self, receiver: EntityId, selector: &str) -> Result<EntityId> {
        self.dispatch(receiver, selector, None)
    }

    /// Parameterized send: `receiver selector argument`
    ///
    /// The argument is bound by reference; it is never copied.
    pub fn send_with_argument(
        &mut self,
        receiver: EntityId,
        selector: &str,
        argument: EntityId,
    ) -> Result<EntityId> {
        self.dispatch(receiver, selector, Some(argument))
    }

    /// Evaluate an entity on its own
    pub fn evaluate(&mut self, entity: EntityId) -> Result<EntityId> {
        self.nested(|world| {
            let kind = world.entity(entity)?.eval_kind();
            match kind {
                EvalKind::Method => {
                    let activation = world.clone_entity(entity)?;
                    world.run_sequence(activation)
                }
                EvalKind::Primitive => world.invoke_native(entity),
                EvalKind::Scalar => world.clone_entity(entity),
                EvalKind::Plain => Ok(entity),
            }
        })
    }

    fn dispatch(
        &mut self,
        receiver: EntityId,
        selector: &str,
        argument: Option<EntityId>,
    ) -> Result<EntityId> {
        let method = self.lookup_slot(receiver, selector)?;
        if let Some(argument) = argument {
            self.entity(argument)?;
        }
        debug!(%receiver, selector, ?argument, "send");

        self.nested(|world| {
            let activation = world.clone_entity(method)?;
            let kind = world.entity(activation)?.eval_kind();
            trace!(%method, %activation, ?kind, "activation");

            // Passive data has nothing to run; its private copy is the answer.
            if !kind.is_executable() {
                return Ok(activation);
            }

            world.assign_slot(activation, SELF_SLOT, receiver)?;
            if let Some(argument) = argument {
                world.assign_slot(activation, PARAMETER_SLOT, argument)?;
            }
            match kind {
                EvalKind::Method => world.run_sequence(activation),
                _ => world.invoke_native(activation),
            }
        })
    }

    /// Send each message of the activation's sequence to the activation
    /// itself and answer the last result (the activation for an empty body)
    fn run_sequence(&mut self, activation: EntityId) -> Result<EntityId> {
        let messages = self
            .entity(activation)?
            .message_sequence()
            .map(<[_]>::to_vec)
            .unwrap_or_default();

        let mut result = activation;
        for message in &messages {
            result = match message.argument {
                Some(producer) => {
                    let argument = self.evaluate(producer)?;
                    self.send_with_argument(activation, &message.selector, argument)?
                }
                None => self.send(activation, &message.selector)?,
            };
        }
        Ok(result)
    }

    fn invoke_native(&mut self, activation: EntityId) -> Result<EntityId> {
        let operation = self
            .entity(activation)?
            .native_operation()
            .cloned()
            .ok_or_else(|| ObjectError::type_mismatch("native operation", activation.to_string()))?;
        trace!(%activation, native = operation.name(), "invoke native");
        operation.invoke(self, activation)
    }

    /// Run `f` one level deeper, refusing once the configured depth is reached
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let limit = self.config.max_send_depth;
        if self.depth >= limit {
            warn!(limit, "send depth exceeded, aborting send chain");
            return Err(ObjectError::SendDepthExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
