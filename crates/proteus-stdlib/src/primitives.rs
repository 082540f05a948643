//! Native operation bodies
//!
//! Every body follows the engine's calling convention: it receives the
//! activation, reads `self` and `parameter` off it and answers a freshly
//! built entity, a well-known object (booleans), or the receiver itself.
//! Number, string and point results share the receiver's parent slots.

use proteus_core::{Entity, EntityId, NativeOperation, ObjectError, Result, Scalar, World};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::info;

/// Well-known objects that primitives answer with or attach results to
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    pub truth: EntityId,
    pub falsehood: EntityId,
    pub number_traits: EntityId,
    pub string_traits: EntityId,
}

impl Anchors {
    pub fn boolean(&self, value: bool) -> EntityId {
        if value {
            self.truth
        } else {
            self.falsehood
        }
    }
}

/// Output of the `print` primitive
///
/// Lines are kept for inspection and, when `echo` is set, also written to
/// stdout.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
    echo: bool,
}

impl Transcript {
    pub fn new(echo: bool) -> Self {
        Self {
            lines: Rc::default(),
            echo,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    fn write(&self, line: String) {
        if self.echo {
            println!("{line}");
        }
        self.lines.borrow_mut().push(line);
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

fn scalar_of(world: &World, id: EntityId) -> Result<Scalar> {
    world
        .scalar(id)?
        .cloned()
        .ok_or_else(|| ObjectError::type_mismatch("scalar", world.describe(id).unwrap_or_default()))
}

fn number_of(world: &World, id: EntityId) -> Result<Number> {
    match scalar_of(world, id)? {
        Scalar::Integer(i) => Ok(Number::Int(i)),
        Scalar::Float(f) => Ok(Number::Float(f.into_inner())),
        other => Err(ObjectError::type_mismatch("number", other.type_name())),
    }
}

fn bool_of(world: &World, id: EntityId) -> Result<bool> {
    match scalar_of(world, id)? {
        Scalar::Boolean(b) => Ok(b),
        other => Err(ObjectError::type_mismatch("boolean", other.type_name())),
    }
}

fn string_of(world: &World, id: EntityId) -> Result<String> {
    match scalar_of(world, id)? {
        Scalar::String(s) => Ok(s),
        other => Err(ObjectError::type_mismatch("string", other.type_name())),
    }
}

fn operands(world: &World, activation: EntityId) -> Result<(EntityId, EntityId)> {
    Ok((world.receiver(activation)?, world.argument(activation)?))
}

/// A new entity inheriting from the same parents as `template`
fn shaped_like(world: &World, template: EntityId) -> Result<Entity> {
    Ok(world
        .entity(template)?
        .parents()
        .fold(Entity::new(), |entity, (name, parent)| {
            entity.with_parent(name, parent)
        }))
}

fn scalar_like(world: &mut World, template: EntityId, value: Scalar) -> Result<EntityId> {
    let entity = shaped_like(world, template)?.with_scalar(value);
    Ok(world.create(entity))
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// `clone`: deep copy of the receiver
pub fn clone_message() -> NativeOperation {
    NativeOperation::new("clone", |world, activation| {
        let receiver = world.receiver(activation)?;
        world.clone_entity(receiver)
    })
}

/// `print`: write the receiver's summary to the transcript, answer the receiver
pub fn print(transcript: Transcript) -> NativeOperation {
    NativeOperation::new("print", move |world, activation| {
        let receiver = world.receiver(activation)?;
        let line = world.describe(receiver)?;
        info!(target: "proteus::transcript", %receiver, "{line}");
        transcript.write(line);
        Ok(receiver)
    })
}

/// `printString`: the receiver's summary as a string object
pub fn print_string(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("printString", move |world, activation| {
        let receiver = world.receiver(activation)?;
        let text = match world.scalar(receiver)? {
            Some(Scalar::String(s)) => s.clone(),
            _ => world.describe(receiver)?,
        };
        Ok(world.create(Entity::scalar(text).with_parent("parent", anchors.string_traits)))
    })
}

/// `==`: identity comparison
pub fn identical(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("==", move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        Ok(anchors.boolean(receiver == argument))
    })
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

fn arithmetic(
    selector: &'static str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> NativeOperation {
    NativeOperation::new(selector, move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        let result = match (number_of(world, receiver)?, number_of(world, argument)?) {
            (Number::Int(a), Number::Int(b)) => int_op(a, b)
                .map(Scalar::Integer)
                .ok_or_else(|| ObjectError::primitive(selector, "integer overflow"))?,
            (a, b) => Scalar::from(float_op(a.as_f64(), b.as_f64())),
        };
        scalar_like(world, receiver, result)
    })
}

pub fn add() -> NativeOperation {
    arithmetic("+", i64::checked_add, |a, b| a + b)
}

pub fn subtract() -> NativeOperation {
    arithmetic("-", i64::checked_sub, |a, b| a - b)
}

pub fn multiply() -> NativeOperation {
    arithmetic("*", i64::checked_mul, |a, b| a * b)
}

/// `/`: truncating for integers; dividing by zero is an error either way
pub fn divide() -> NativeOperation {
    NativeOperation::new("/", |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        let divisor = number_of(world, argument)?;
        if divisor.as_f64() == 0.0 {
            return Err(ObjectError::primitive("/", "division by zero"));
        }
        let result = match (number_of(world, receiver)?, divisor) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_div(b)
                .map(Scalar::Integer)
                .ok_or_else(|| ObjectError::primitive("/", "integer overflow"))?,
            (a, b) => Scalar::from(a.as_f64() / b.as_f64()),
        };
        scalar_like(world, receiver, result)
    })
}

fn comparison(
    selector: &'static str,
    anchors: Anchors,
    accept: fn(Ordering) -> bool,
) -> NativeOperation {
    NativeOperation::new(selector, move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        let ordering = number_of(world, receiver)?.compare(number_of(world, argument)?);
        Ok(anchors.boolean(ordering.is_some_and(accept)))
    })
}

pub fn less_than(anchors: Anchors) -> NativeOperation {
    comparison("<", anchors, Ordering::is_lt)
}

pub fn greater_than(anchors: Anchors) -> NativeOperation {
    comparison(">", anchors, Ordering::is_gt)
}

pub fn equal(anchors: Anchors) -> NativeOperation {
    comparison("=", anchors, Ordering::is_eq)
}

// ---------------------------------------------------------------------------
// Booleans
// ---------------------------------------------------------------------------

pub fn not(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("not", move |world, activation| {
        let receiver = world.receiver(activation)?;
        Ok(anchors.boolean(!bool_of(world, receiver)?))
    })
}

pub fn and(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("&", move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        Ok(anchors.boolean(bool_of(world, receiver)? && bool_of(world, argument)?))
    })
}

pub fn or(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("|", move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        Ok(anchors.boolean(bool_of(world, receiver)? || bool_of(world, argument)?))
    })
}

fn conditional(selector: &'static str, when: bool) -> NativeOperation {
    NativeOperation::new(selector, move |world, activation| {
        let (receiver, block) = operands(world, activation)?;
        if bool_of(world, receiver)? == when {
            world.evaluate(block)
        } else {
            Ok(receiver)
        }
    })
}

/// `ifTrue:`: evaluate the block when the receiver is true, else answer it
pub fn if_true() -> NativeOperation {
    conditional("ifTrue:", true)
}

/// `ifFalse:`: evaluate the block when the receiver is false, else answer it
pub fn if_false() -> NativeOperation {
    conditional("ifFalse:", false)
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// `,`: concatenation
pub fn concat() -> NativeOperation {
    NativeOperation::new(",", |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        let mut text = string_of(world, receiver)?;
        text.push_str(&string_of(world, argument)?);
        scalar_like(world, receiver, Scalar::String(text))
    })
}

/// `size`: length in characters
pub fn size(anchors: Anchors) -> NativeOperation {
    NativeOperation::new("size", move |world, activation| {
        let receiver = world.receiver(activation)?;
        let length = string_of(world, receiver)?.chars().count();
        let length = i64::try_from(length)
            .map_err(|_| ObjectError::primitive("size", "string too long"))?;
        Ok(world.create(Entity::scalar(length).with_parent("parent", anchors.number_traits)))
    })
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// Coordinate setter (`x:` / `y:`): mutates the receiver and answers it
pub fn setter(selector: &'static str, slot: &'static str) -> NativeOperation {
    NativeOperation::new(selector, move |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        world.assign_slot(receiver, slot, argument)?;
        Ok(receiver)
    })
}

/// `+` on points: coordinate-wise sum, computed by sending `+` to the
/// coordinates themselves
pub fn point_add() -> NativeOperation {
    NativeOperation::new("+", |world, activation| {
        let (receiver, argument) = operands(world, activation)?;
        let x = coordinate_sum(world, receiver, argument, "x")?;
        let y = coordinate_sum(world, receiver, argument, "y")?;
        let point = shaped_like(world, receiver)?.with_slot("x", x).with_slot("y", y);
        Ok(world.create(point))
    })
}

fn coordinate_sum(
    world: &mut World,
    left: EntityId,
    right: EntityId,
    coordinate: &str,
) -> Result<EntityId> {
    let a = world.send(left, coordinate)?;
    let b = world.send(right, coordinate)?;
    world.send_with_argument(a, "+", b)
}
