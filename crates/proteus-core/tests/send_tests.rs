//! Tests for evaluation and the message-send protocol

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proteus_core::{
    msg, Entity, EntityId, Message, NativeOperation, ObjectError, Result, Scalar, World,
    WorldConfig,
};

fn int(world: &World, id: EntityId) -> Result<i64> {
    world
        .scalar(id)?
        .and_then(Scalar::as_i64)
        .ok_or_else(|| ObjectError::type_mismatch("integer", id.to_string()))
}

/// `+` answering a new number that shares the receiver's parent
fn plus() -> NativeOperation {
    NativeOperation::new("+", |world, activation| {
        let receiver = world.receiver(activation)?;
        let argument = world.argument(activation)?;
        let sum = int(world, receiver)? + int(world, argument)?;
        let traits = world
            .slot(receiver, "parent")?
            .ok_or_else(|| ObjectError::slot_not_found("parent"))?;
        Ok(world.create(Entity::scalar(sum).with_parent("parent", traits)))
    })
}

#[test]
fn test_arithmetic_through_shared_parent() {
    let mut world = World::new();
    let add = world.create(Entity::native(plus()));
    let number = world.create(Entity::new().with_slot("+", add));
    let ten = world.create(Entity::scalar(10).with_parent("parent", number));
    let five = world.create(Entity::scalar(5).with_parent("parent", number));

    let fifteen = world.send_with_argument(ten, "+", five).unwrap();
    assert_eq!(int(&world, fifteen).unwrap(), 15);

    // The answer is a number too
    let twenty = world.send_with_argument(fifteen, "+", five).unwrap();
    assert_eq!(int(&world, twenty).unwrap(), 20);

    // Operands are untouched
    assert_eq!(int(&world, ten).unwrap(), 10);
    assert_eq!(int(&world, five).unwrap(), 5);
}

#[test]
fn test_inherited_data_slot() {
    let mut world = World::new();
    let woof = world.create(Entity::scalar("woof"));
    let animal = world.create(Entity::new().with_slot("speak", woof));
    let dog = world.create(Entity::new().with_parent("parent", animal));

    let said = world.send(dog, "speak").unwrap();
    assert_eq!(world.scalar(said).unwrap(), Some(&Scalar::from("woof")));
    assert!(!world.entity(dog).unwrap().has_slot("speak"));
}

#[test]
fn test_inherited_method_binds_original_receiver() {
    let mut world = World::new();
    let whoami = NativeOperation::new("whoami", |world, activation| world.receiver(activation));
    let method = world.create(Entity::native(whoami));
    let animal = world.create(Entity::new().with_slot("whoami", method));
    let dog = world.create(Entity::new().with_parent("parent", animal));

    assert_eq!(world.send(dog, "whoami").unwrap(), dog);
    assert_eq!(world.send(animal, "whoami").unwrap(), animal);
}

#[test]
fn test_method_reads_receiver_through_self_parent() {
    let mut world = World::new();
    let woof = world.create(Entity::scalar("woof"));
    let placeholder = world.create(Entity::new());
    // `self` is declared as a parent, so binding the receiver makes its
    // slots visible to the body's sends.
    let describe = world.create(Entity::method(vec![msg!(sound)]).with_parent("self", placeholder));
    let animal = world.create(Entity::new().with_slot("describe", describe));
    let dog = world.create(
        Entity::new()
            .with_parent("parent", animal)
            .with_slot("sound", woof),
    );

    let said = world.send(dog, "describe").unwrap();
    assert_eq!(world.scalar(said).unwrap(), Some(&Scalar::from("woof")));
}

#[test]
fn test_send_does_not_mutate_receiver() {
    let mut world = World::new();
    let whoami = NativeOperation::new("whoami", |world, activation| world.receiver(activation));
    let method = world.create(Entity::native(whoami));
    let receiver = world.create(Entity::new().with_slot("whoami", method));

    world.send(receiver, "whoami").unwrap();
    world.send_with_argument(receiver, "whoami", method).unwrap();

    let entity = world.entity(receiver).unwrap();
    assert_eq!(entity.slot_count(), 1);
    assert!(!entity.has_slot("self"));
    assert!(!entity.has_slot("parameter"));
}

#[test]
fn test_parameter_is_fresh_per_send() {
    let mut world = World::new();
    let activations = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&activations);
    let echo = NativeOperation::new("echo:", move |world, activation| {
        record.borrow_mut().push(activation);
        world.argument(activation)
    });
    let method = world.create(Entity::native(echo));
    let receiver = world.create(Entity::new().with_slot("echo:", method));
    let first = world.create(Entity::scalar(1));
    let second = world.create(Entity::scalar(2));

    assert_eq!(world.send_with_argument(receiver, "echo:", first).unwrap(), first);
    assert_eq!(world.send_with_argument(receiver, "echo:", second).unwrap(), second);

    let activations = activations.borrow();
    assert_eq!(activations.len(), 2);
    assert_ne!(activations[0], activations[1]);
    assert_eq!(world.argument(activations[0]).unwrap(), first);
    assert_eq!(world.argument(activations[1]).unwrap(), second);

    // The stored method never sees a binding
    assert!(!world.entity(method).unwrap().has_slot("parameter"));
}

#[test]
fn test_sequence_wins_over_scalar() {
    let mut world = World::new();
    let one = world.create(Entity::scalar(1));
    let body = world.create(
        Entity::scalar(99)
            .with_messages(vec![msg!(one)])
            .with_slot("one", one),
    );

    let result = world.evaluate(body).unwrap();
    assert_eq!(int(&world, result).unwrap(), 1);
}

#[test]
fn test_sequence_answers_last_result() {
    let mut world = World::new();
    let first = world.create(Entity::scalar("first"));
    let last = world.create(Entity::scalar("last"));
    let body = world.create(
        Entity::method(vec![msg!(first), msg!(last)])
            .with_slot("first", first)
            .with_slot("last", last),
    );

    let result = world.evaluate(body).unwrap();
    assert_eq!(world.scalar(result).unwrap(), Some(&Scalar::from("last")));
}

#[test]
fn test_sequence_evaluates_argument_producers() {
    let mut world = World::new();
    let echo = NativeOperation::new("echo:", |world, activation| world.argument(activation));
    let method = world.create(Entity::native(echo));
    let literal = world.create(Entity::scalar(7));
    let body = world.create(
        Entity::method(vec![Message::with_argument("echo:", literal)]).with_slot("echo:", method),
    );

    let result = world.evaluate(body).unwrap();
    // Scalars evaluate to a private copy
    assert_ne!(result, literal);
    assert_eq!(int(&world, result).unwrap(), 7);
}

#[test]
fn test_evaluate_scalar_copies() {
    let mut world = World::new();
    let five = world.create(Entity::scalar(5));

    let copy = world.evaluate(five).unwrap();
    assert_ne!(copy, five);
    assert_eq!(int(&world, copy).unwrap(), 5);
}

#[test]
fn test_evaluate_native_receives_entity() {
    let mut world = World::new();
    let seen = Rc::new(Cell::new(None));
    let record = Rc::clone(&seen);
    let op = NativeOperation::new("probe", move |world, activation| {
        record.set(Some(activation));
        Ok(world.create(Entity::scalar(true)))
    });
    let primitive = world.create(Entity::native(op));

    let result = world.evaluate(primitive).unwrap();
    assert_eq!(seen.get(), Some(primitive));
    assert_eq!(world.scalar(result).unwrap(), Some(&Scalar::from(true)));
}

/// `countdown:` counting its own invocations
fn countdown(calls: Rc<Cell<usize>>) -> NativeOperation {
    NativeOperation::new("countdown:", move |world, activation| {
        calls.set(calls.get() + 1);
        let receiver = world.receiver(activation)?;
        let remaining = int(world, world.argument(activation)?)?;
        if remaining == 0 {
            return Ok(receiver);
        }
        let next = world.create(Entity::scalar(remaining - 1));
        world.send_with_argument(receiver, "countdown:", next)
    })
}

#[test]
fn test_countdown_recursion() {
    for start in [0, 1, 5, 50] {
        let mut world = World::new();
        let calls = Rc::new(Cell::new(0));
        let method = world.create(Entity::native(countdown(Rc::clone(&calls))));
        let counter = world.create(Entity::new().with_slot("countdown:", method));
        let n = world.create(Entity::scalar(start));

        let result = world.send_with_argument(counter, "countdown:", n).unwrap();
        assert_eq!(result, counter);
        assert_eq!(calls.get(), start as usize + 1);
    }
}

#[test]
fn test_depth_limit_aborts_chain() {
    let mut world = World::with_config(WorldConfig {
        max_send_depth: 8,
        ..WorldConfig::default()
    });
    let calls = Rc::new(Cell::new(0));
    let method = world.create(Entity::native(countdown(Rc::clone(&calls))));
    let counter = world.create(Entity::new().with_slot("countdown:", method));

    let deep = world.create(Entity::scalar(100));
    let err = world.send_with_argument(counter, "countdown:", deep).unwrap_err();
    assert_eq!(err, ObjectError::SendDepthExceeded { limit: 8 });

    // The world is usable again afterwards
    let shallow = world.create(Entity::scalar(3));
    assert!(world.send_with_argument(counter, "countdown:", shallow).is_ok());
}

#[test]
fn test_primitive_errors_propagate() {
    let mut world = World::new();
    let fail = NativeOperation::new("fail", |_, _| Err(ObjectError::primitive("fail", "always")));
    let primitive = world.create(Entity::native(fail));
    let placeholder = world.create(Entity::new());
    let body = world.create(
        Entity::method(vec![msg!(fail)]).with_parent("self", placeholder),
    );
    let receiver = world.create(
        Entity::new()
            .with_slot("fail", primitive)
            .with_slot("run", body),
    );

    let err = world.send(receiver, "run").unwrap_err();
    assert_eq!(err, ObjectError::primitive("fail", "always"));
}

#[test]
fn test_not_found_supports_fallback() {
    let mut world = World::new();
    let default = world.create(Entity::scalar("default"));
    let receiver = world.create(Entity::new().with_slot("fallback", default));

    let result = match world.send(receiver, "override") {
        Err(err) if err.is_not_found() => world.send(receiver, "fallback"),
        other => other,
    }
    .unwrap();
    assert_eq!(world.scalar(result).unwrap(), Some(&Scalar::from("default")));
}
