//! Entity/component store behavior: registration discipline, absent vs
//! unregistered access, and set-intersection queries.

use chronica_core::{error::SimError, world::World};

#[derive(Debug, Clone, PartialEq)]
struct Population(i64);

#[derive(Debug, Clone, PartialEq)]
struct Fortified;

#[derive(Debug, Clone, PartialEq)]
struct Coastal;

#[test]
fn entities_are_unique_and_monotonic() {
    let mut world = World::new();
    let a = world.create_entity();
    let b = world.create_entity();
    let c = world.create_entity();
    assert!(a.0 < b.0 && b.0 < c.0);
    assert_eq!(world.entity_count(), 3);
}

#[test]
fn add_get_remove_roundtrip() {
    let mut world = World::new();
    world.register_component("population");
    let e = world.create_entity();

    world.add_component(e, "population", Population(120)).unwrap();
    assert_eq!(
        world.get_component::<Population>(e, "population").unwrap(),
        Some(&Population(120))
    );

    // Overwrite is allowed.
    world.add_component(e, "population", Population(150)).unwrap();
    assert_eq!(
        world.get_component::<Population>(e, "population").unwrap(),
        Some(&Population(150))
    );

    assert!(world.remove_component(e, "population").unwrap());
    assert!(!world.remove_component(e, "population").unwrap());
    assert_eq!(
        world.get_component::<Population>(e, "population").unwrap(),
        None
    );
}

#[test]
fn absent_component_is_none_not_error() {
    let mut world = World::new();
    world.register_component("population");
    let e = world.create_entity();
    assert_eq!(
        world.get_component::<Population>(e, "population").unwrap(),
        None
    );
}

#[test]
fn unregistered_store_fails_loudly() {
    let mut world = World::new();
    let e = world.create_entity();

    assert!(matches!(
        world.add_component(e, "ghost", Population(1)),
        Err(SimError::UnregisteredStore(_))
    ));
    assert!(matches!(
        world.get_component::<Population>(e, "ghost"),
        Err(SimError::UnregisteredStore(_))
    ));
    assert!(matches!(
        world.remove_component(e, "ghost"),
        Err(SimError::UnregisteredStore(_))
    ));
    assert!(matches!(
        world.query(&["ghost"]),
        Err(SimError::UnregisteredStore(_))
    ));
}

#[test]
fn reregistering_preserves_data() {
    let mut world = World::new();
    world.register_component("population");
    let e = world.create_entity();
    world.add_component(e, "population", Population(7)).unwrap();

    world.register_component("population");
    assert_eq!(
        world.get_component::<Population>(e, "population").unwrap(),
        Some(&Population(7))
    );
}

#[test]
fn wrong_type_is_a_mismatch_error() {
    let mut world = World::new();
    world.register_component("population");
    let e = world.create_entity();
    world.add_component(e, "population", Population(9)).unwrap();

    assert!(matches!(
        world.get_component::<Fortified>(e, "population"),
        Err(SimError::ComponentTypeMismatch { .. })
    ));
}

#[test]
fn has_store_reports_registration() {
    let mut world = World::new();
    assert!(!world.has_store("population"));
    world.register_component("population");
    assert!(world.has_store("population"));
}

#[test]
fn query_intersects_all_listed_stores() {
    let mut world = World::new();
    world.register_component("population");
    world.register_component("fortified");
    world.register_component("coastal");

    let plain = world.create_entity();
    let fort = world.create_entity();
    let port = world.create_entity();
    let citadel = world.create_entity();

    for e in [plain, fort, port, citadel] {
        world.add_component(e, "population", Population(100)).unwrap();
    }
    world.add_component(fort, "fortified", Fortified).unwrap();
    world.add_component(citadel, "fortified", Fortified).unwrap();
    world.add_component(port, "coastal", Coastal).unwrap();
    world.add_component(citadel, "coastal", Coastal).unwrap();

    let mut all = world.query(&["population"]).unwrap();
    all.sort();
    assert_eq!(all, vec![plain, fort, port, citadel]);

    let mut fortified = world.query(&["population", "fortified"]).unwrap();
    fortified.sort();
    assert_eq!(fortified, vec![fort, citadel]);

    let mut both = world.query(&["population", "fortified", "coastal"]).unwrap();
    both.sort();
    assert_eq!(both, vec![citadel]);

    assert!(world.query(&[]).unwrap().is_empty());
}

#[test]
fn removing_all_components_leaves_entity_out_of_queries() {
    let mut world = World::new();
    world.register_component("population");
    let e = world.create_entity();
    world.add_component(e, "population", Population(50)).unwrap();
    assert_eq!(world.query(&["population"]).unwrap(), vec![e]);

    world.remove_component(e, "population").unwrap();
    assert!(world.query(&["population"]).unwrap().is_empty());
    assert_eq!(world.component_count("population").unwrap(), 0);
}
