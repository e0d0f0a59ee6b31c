use noema_core::model::{ExploreOptions, RelationInput, TemporalDirection, TemporalOptions};
use noema_e2e::{entity, test_engine};
use serde_json::Map;

fn relation(from: &str, to: &str, relation_type: &str, weight: f64) -> RelationInput {
    RelationInput {
        from: from.to_string(),
        to: to.to_string(),
        relation_type: relation_type.to_string(),
        confidence: None,
        weight: Some(weight),
        context: None,
        properties: Map::new(),
    }
}

#[test]
fn explore_context_expands_outward_and_prunes_by_weight() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("A"), entity("B"), entity("C")]).unwrap();
    db.engine
        .create_relations(vec![relation("A", "B", "RELATES_TO", 0.9), relation("B", "C", "RELATES_TO", 0.1)])
        .unwrap();

    let fragment = db
        .engine
        .explore_context(
            &["A".to_string()],
            ExploreOptions { max_depth: 2, min_weight: 0.5, include_types: None },
        )
        .unwrap();

    let names: Vec<_> = fragment.entities.iter().map(|n| n.name.as_str()).collect();
    assert!(names.contains(&"B"));
    assert!(!names.contains(&"C"), "the A-B-C hop is pruned below min_weight");
}

#[test]
fn explore_context_is_undirected() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("A"), entity("B")]).unwrap();
    db.engine.create_relations(vec![relation("A", "B", "RELATES_TO", 0.9)]).unwrap();

    let fragment = db
        .engine
        .explore_context(&["B".to_string()], ExploreOptions::default())
        .unwrap();

    let names: Vec<_> = fragment.entities.iter().map(|n| n.name.as_str()).collect();
    assert!(names.contains(&"A"), "traversal follows incoming edges too");
}

#[test]
fn temporal_sequence_follows_fixed_relation_types_forward() {
    let db = test_engine();
    db.engine
        .create_nodes(vec![entity("Event1"), entity("Event2"), entity("Event3")])
        .unwrap();
    db.engine
        .create_relations(vec![relation("Event1", "Event2", "FOLLOWS", 0.5), relation("Event2", "Event3", "NEXT", 0.5)])
        .unwrap();

    let fragment = db
        .engine
        .get_temporal_sequence(
            "Event1",
            TemporalOptions { direction: TemporalDirection::Forward, max_events: 10 },
        )
        .unwrap();

    let names: Vec<_> = fragment.entities.iter().map(|n| n.name.as_str()).collect();
    assert!(names.contains(&"Event2"));
    assert!(names.contains(&"Event3"));
}

#[test]
fn temporal_sequence_ignores_non_temporal_relations() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("Event1"), entity("Unrelated")]).unwrap();
    db.engine.create_relations(vec![relation("Event1", "Unrelated", "RELATES_TO", 0.5)]).unwrap();

    let fragment = db
        .engine
        .get_temporal_sequence(
            "Event1",
            TemporalOptions { direction: TemporalDirection::Forward, max_events: 10 },
        )
        .unwrap();

    assert_eq!(fragment.entities.len(), 1);
}

#[test]
fn shortest_path_finds_shortest_route() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("A"), entity("B"), entity("C"), entity("D")]).unwrap();
    db.engine
        .create_relations(vec![
            relation("A", "B", "RELATES_TO", 0.5),
            relation("B", "C", "RELATES_TO", 0.5),
            relation("A", "D", "RELATES_TO", 0.5),
        ])
        .unwrap();

    let fragment = db.engine.find_shortest_path("A", "C", 6).unwrap();
    let names: Vec<_> = fragment.entities.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(fragment.relations.len(), 2);
}

#[test]
fn shortest_path_follows_incoming_edges_too() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("A"), entity("B")]).unwrap();
    // The only edge points B -> A; an undirected search from A must still
    // reach B (spec.md §4.6/§9 — reachability matches `explore_context`).
    db.engine.create_relations(vec![relation("B", "A", "RELATES_TO", 0.5)]).unwrap();

    let fragment = db.engine.find_shortest_path("A", "B", 6).unwrap();
    let names: Vec<_> = fragment.entities.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn shortest_path_returns_empty_fragment_when_unreachable() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("A"), entity("B")]).unwrap();

    let fragment = db.engine.find_shortest_path("A", "B", 6).unwrap();
    assert!(fragment.is_empty());
}
