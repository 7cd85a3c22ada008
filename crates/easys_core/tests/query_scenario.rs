//! # Intersection Query Verification
//!
//! Entities `0..10` carry `Position` when divisible by 2, `Velocity` when
//! divisible by 3 and `Health` when divisible by 5.
//!
//! Run with: cargo test --test query_scenario

use easys_core::{Entity, World};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Health(u32);

struct NeverRegistered;

fn build_world() -> World {
    let mut world = World::new();
    for _ in 0..10 {
        let entity = world.add_entity().unwrap();
        if entity % 2 == 0 {
            world
                .add_component(entity, Position { x: 0.0, y: 0.0 })
                .unwrap();
        }
        if entity % 3 == 0 {
            world
                .add_component(entity, Velocity { dx: 1.0, dy: 1.0 })
                .unwrap();
        }
        if entity % 5 == 0 {
            world.add_component(entity, Health(100)).unwrap();
        }
    }
    world
}

#[test]
fn single_type_query() {
    let world = build_world();
    let entities = world.get_entities_by_components::<(Position,)>();
    assert_eq!(entities.len(), 5);
    assert_eq!(entities, vec![0, 2, 4, 6, 8]);
}

#[test]
fn two_type_query() {
    let world = build_world();
    let entities = world.get_entities_by_components::<(Position, Velocity)>();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities, vec![0, 6]);
}

#[test]
fn three_type_query() {
    let world = build_world();
    let entities = world.get_entities_by_components::<(Position, Velocity, Health)>();
    assert_eq!(entities, vec![0]);
}

#[test]
fn query_reflects_removals() {
    let mut world = build_world();
    world.remove_entity(0).unwrap();
    world.remove_component::<Velocity>(6);

    assert!(world
        .get_entities_by_components::<(Position, Velocity)>()
        .is_empty());
    assert_eq!(
        world.get_entities_by_components::<(Velocity, Health)>(),
        Vec::<Entity>::new()
    );
    assert_eq!(world.get_entities_by_components::<(Position,)>(), vec![2, 4, 6, 8]);
}

#[test]
fn unknown_types_never_raise() {
    let world = build_world();

    assert!(world
        .get_entities_by_components::<(NeverRegistered,)>()
        .is_empty());
    assert!(world
        .get_entities_by_components::<(Position, NeverRegistered, Health)>()
        .is_empty());
    assert_eq!(world.component_count_of::<(NeverRegistered,)>(), 0);
    assert!(world.get_entities_by_component::<NeverRegistered>().is_empty());
    assert!(world.get_component::<NeverRegistered>(0).is_err());
}

#[test]
fn component_counts() {
    let mut world = build_world();
    assert_eq!(world.component_count(), 5 + 4 + 2);
    assert_eq!(world.component_count_of::<(Velocity, Health)>(), 6);

    world.clear_components::<(Velocity, NeverRegistered)>();
    assert_eq!(world.component_count(), 5 + 2);
}
