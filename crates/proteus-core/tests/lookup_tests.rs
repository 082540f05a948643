//! Tests for breadth-first lookup and its precedence rules

use proptest::prelude::*;
use proteus_core::{Entity, EntityId, ObjectError, World};

fn number(world: &mut World, value: i64) -> EntityId {
    world.create(Entity::scalar(value))
}

#[test]
fn test_missing_slot_is_not_found() {
    let mut world = World::new();
    let base = world.create(Entity::new());
    let child = world.create(Entity::new().with_parent("parent", base));

    let err = world.send(child, "fly").unwrap_err();
    assert_eq!(err, ObjectError::slot_not_found("fly"));
}

#[test]
fn test_local_slot_wins_over_parent() {
    let mut world = World::new();
    let inherited = number(&mut world, 1);
    let own = number(&mut world, 2);
    let base = world.create(Entity::new().with_slot("value", inherited));
    let child = world.create(
        Entity::new()
            .with_parent("parent", base)
            .with_slot("value", own),
    );

    assert_eq!(world.lookup(child, "value").unwrap(), child);

    let result = world.send(child, "value").unwrap();
    assert_eq!(world.scalar(result).unwrap().and_then(|s| s.as_i64()), Some(2));
}

#[test]
fn test_direct_parent_beats_grandparent() {
    let mut world = World::new();
    let near = number(&mut world, 1);
    let far = number(&mut world, 2);

    // First parent's branch reaches a grandparent defining `name`...
    let grandparent = world.create(Entity::new().with_slot("name", far));
    let first = world.create(Entity::new().with_parent("up", grandparent));
    // ...but the second direct parent defines it too, one level closer.
    let second = world.create(Entity::new().with_slot("name", near));
    let child = world.create(
        Entity::new()
            .with_parent("first", first)
            .with_parent("second", second),
    );

    assert_eq!(world.lookup(child, "name").unwrap(), second);
}

#[test]
fn test_earlier_attached_parent_wins_tie() {
    let mut world = World::new();
    let a_value = number(&mut world, 1);
    let b_value = number(&mut world, 2);
    let a = world.create(Entity::new().with_slot("name", a_value));
    let b = world.create(Entity::new().with_slot("name", b_value));
    let child = world.create(Entity::new());

    world.assign_parent_slot(child, "b", b).unwrap();
    world.assign_slot(child, "a", a).unwrap();
    world.mark_as_parent(child, "a").unwrap();

    assert_eq!(world.lookup(child, "name").unwrap(), b);
}

#[test]
fn test_grandparent_found_when_parents_lack_name() {
    let mut world = World::new();
    let value = number(&mut world, 3);
    let grandparent = world.create(Entity::new().with_slot("depth", value));
    let left = world.create(Entity::new());
    let right = world.create(Entity::new().with_parent("up", grandparent));
    let child = world.create(
        Entity::new()
            .with_parent("left", left)
            .with_parent("right", right),
    );

    assert_eq!(world.lookup(child, "depth").unwrap(), grandparent);
}

#[test]
fn test_cyclic_parents_terminate() {
    let mut world = World::new();
    let a = world.create(Entity::new());
    let b = world.create(Entity::new().with_parent("parent", a));
    world.assign_parent_slot(a, "parent", b).unwrap();

    assert!(world.send(a, "undefined").unwrap_err().is_not_found());
    assert!(world.send(b, "undefined").unwrap_err().is_not_found());

    // Names on either side of the cycle still resolve
    assert_eq!(world.lookup(a, "parent").unwrap(), a);
}

#[test]
fn test_self_parent_cycle_terminates() {
    let mut world = World::new();
    let lonely = world.create(Entity::new());
    world.assign_parent_slot(lonely, "me", lonely).unwrap();

    assert!(world.lookup(lonely, "anything").unwrap_err().is_not_found());
}

/// Random graph: `edges[i]` are `(target, slot_name, is_parent)` for node i
fn arbitrary_graph() -> impl Strategy<Value = Vec<Vec<(usize, u8, bool)>>> {
    (1usize..10).prop_flat_map(|n| {
        prop::collection::vec(
            prop::collection::vec((0..n, 0u8..5, any::<bool>()), 0..4),
            n,
        )
    })
}

fn build(world: &mut World, edges: &[Vec<(usize, u8, bool)>]) -> Vec<EntityId> {
    let ids: Vec<_> = edges.iter().map(|_| world.create(Entity::new())).collect();
    for (from, slots) in edges.iter().enumerate() {
        for &(to, name, parent) in slots {
            let name = format!("s{name}");
            if parent {
                world.assign_parent_slot(ids[from], name, ids[to]).unwrap();
            } else {
                world.assign_slot(ids[from], name, ids[to]).unwrap();
            }
        }
    }
    ids
}

proptest! {
    /// Lookup terminates on any graph and answers an entity owning the slot
    #[test]
    fn prop_lookup_finds_an_owner(edges in arbitrary_graph(), name in 0u8..6) {
        let mut world = World::new();
        let ids = build(&mut world, &edges);
        let name = format!("s{name}");

        for &receiver in &ids {
            match world.lookup(receiver, &name) {
                Ok(owner) => {
                    prop_assert!(world.entity(owner).unwrap().has_slot(&name));
                    if world.entity(receiver).unwrap().has_slot(&name) {
                        prop_assert_eq!(owner, receiver);
                    }
                }
                Err(err) => prop_assert!(err.is_not_found()),
            }
        }
    }
}
