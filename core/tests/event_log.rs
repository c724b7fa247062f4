//! Event log behavior: monotonic append, entity indexing, and cascade
//! traversal over cyclic cause/consequence links.

use chronica_core::{
    error::SimError,
    event::{EventCategory, EventDraft, EventFactory, WorldEvent},
    event_log::EventLog,
    types::{Entity, EventId},
};

fn make(factory: &mut EventFactory, subtype: &str, participants: &[Entity]) -> WorldEvent {
    factory
        .create(
            EventDraft::new(EventCategory::Political, subtype, 1)
                .participants(participants.iter().copied()),
        )
        .expect("create event")
}

#[test]
fn append_rejects_non_monotonic_ids() {
    let mut factory = EventFactory::new();
    let first = make(&mut factory, "a.b", &[]);
    let second = make(&mut factory, "a.c", &[]);

    let mut log = EventLog::new();
    log.append(second).unwrap();
    assert!(matches!(
        log.append(first),
        Err(SimError::NonMonotonicEvent { .. })
    ));
    assert_eq!(log.len(), 1);
}

#[test]
fn get_by_id_and_all_in_append_order() {
    let mut factory = EventFactory::new();
    let mut log = EventLog::new();
    let a = make(&mut factory, "x.a", &[]);
    let b = make(&mut factory, "x.b", &[]);
    let (id_a, id_b) = (a.id, b.id);
    log.append(a).unwrap();
    log.append(b).unwrap();

    assert_eq!(log.get(id_a).unwrap().subtype, "x.a");
    assert_eq!(log.get(id_b).unwrap().subtype, "x.b");
    assert!(log.get(EventId(999)).is_none());

    let subtypes: Vec<&str> = log.all().iter().map(|e| e.subtype.as_str()).collect();
    assert_eq!(subtypes, vec!["x.a", "x.b"]);
}

#[test]
fn entity_index_covers_participants_and_location() {
    let hero = Entity(10);
    let town = Entity(20);
    let bystander = Entity(30);

    let mut factory = EventFactory::new();
    let mut log = EventLog::new();

    let arrival = factory
        .create(
            EventDraft::new(EventCategory::Exploration, "journey.arrival", 3)
                .participant(hero)
                .location(town),
        )
        .unwrap();
    let feast = make(&mut factory, "feast.held", &[hero, bystander]);
    let unrelated = make(&mut factory, "storm.passed", &[]);
    let (arrival_id, feast_id) = (arrival.id, feast.id);

    log.append(arrival).unwrap();
    log.append(feast).unwrap();
    log.append(unrelated).unwrap();

    let hero_events: Vec<EventId> = log.for_entity(hero).iter().map(|e| e.id).collect();
    assert_eq!(hero_events, vec![arrival_id, feast_id]);

    // Location counts as a reference too.
    let town_events: Vec<EventId> = log.for_entity(town).iter().map(|e| e.id).collect();
    assert_eq!(town_events, vec![arrival_id]);

    assert!(log.for_entity(Entity(99)).is_empty());
}

#[test]
fn entity_as_participant_and_location_is_indexed_once() {
    let town = Entity(5);
    let mut factory = EventFactory::new();
    let mut log = EventLog::new();
    let event = factory
        .create(
            EventDraft::new(EventCategory::Natural, "flood.struck", 9)
                .participant(town)
                .location(town),
        )
        .unwrap();
    log.append(event).unwrap();

    assert_eq!(log.for_entity(town).len(), 1);
}

/// Builds a log where consequences form a cycle a → b → c → a.
fn cyclic_log() -> (EventLog, EventId, EventId, EventId) {
    let mut factory = EventFactory::new();
    let mut a = make(&mut factory, "cycle.a", &[]);
    let mut b = make(&mut factory, "cycle.b", &[]);
    let mut c = make(&mut factory, "cycle.c", &[]);
    a.consequences.push(b.id);
    b.consequences.push(c.id);
    c.consequences.push(a.id);
    let (ia, ib, ic) = (a.id, b.id, c.id);

    let mut log = EventLog::new();
    log.append(a).unwrap();
    log.append(b).unwrap();
    log.append(c).unwrap();
    (log, ia, ib, ic)
}

#[test]
fn cascade_terminates_on_cycles_without_revisits() {
    let (log, a, b, c) = cyclic_log();

    let tree = log.cascade(a, 10).expect("root exists");
    assert_eq!(tree.count(), 3, "each event appears exactly once");
    assert_eq!(tree.id, a);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, b);
    assert_eq!(tree.children[0].children[0].id, c);
    // The cycle edge c → a is dropped, not followed.
    assert!(tree.children[0].children[0].children.is_empty());
    assert_eq!(tree.deepest(), 2);
}

#[test]
fn cascade_respects_max_depth() {
    let mut factory = EventFactory::new();
    let mut chain: Vec<WorldEvent> = (0..5)
        .map(|i| make(&mut factory, &format!("chain.{i}"), &[]))
        .collect();
    for i in 0..4 {
        let next = chain[i + 1].id;
        chain[i].consequences.push(next);
    }
    let root = chain[0].id;

    let mut log = EventLog::new();
    for event in chain {
        log.append(event).unwrap();
    }

    let tree = log.cascade(root, 2).expect("root exists");
    assert_eq!(tree.count(), 3, "root + two levels");
    assert_eq!(tree.deepest(), 2);

    let full = log.cascade(root, 100).expect("root exists");
    assert_eq!(full.count(), 5);
    assert_eq!(full.deepest(), 4);

    let just_root = log.cascade(root, 0).expect("root exists");
    assert_eq!(just_root.count(), 1);
}

#[test]
fn cascade_skips_links_to_unknown_events() {
    let mut factory = EventFactory::new();
    let mut a = make(&mut factory, "solo.a", &[]);
    a.consequences.push(EventId(777)); // never appended
    let root = a.id;

    let mut log = EventLog::new();
    log.append(a).unwrap();

    let tree = log.cascade(root, 5).expect("root exists");
    assert_eq!(tree.count(), 1);
}

#[test]
fn cascade_of_unknown_root_is_none() {
    let log = EventLog::new();
    assert!(log.cascade(EventId(0), 5).is_none());
}

#[test]
fn significance_is_validated_by_the_factory() {
    let mut factory = EventFactory::new();
    let result = factory.create(
        EventDraft::new(EventCategory::Cultural, "song.sung", 0).significance(101),
    );
    assert!(matches!(
        result,
        Err(SimError::SignificanceOutOfRange(101))
    ));
    // Valid boundary passes.
    assert!(factory
        .create(EventDraft::new(EventCategory::Cultural, "song.sung", 0).significance(100))
        .is_ok());
}
