use noema_core::model::SearchOptions;
use noema_e2e::{entity, node_of_kind, test_engine};

#[test]
fn search_matches_on_description_text() {
    let db = test_engine();
    let mut input = entity("Eddington");
    input.description = Some("astronomer who confirmed general relativity".into());
    db.engine.create_nodes(vec![input]).unwrap();

    let results = db.engine.search_nodes("relativity", SearchOptions::default()).unwrap();
    assert_eq!(results.entities.len(), 1);
    assert_eq!(results.entities[0].name, "Eddington");
}

#[test]
fn search_filters_by_node_type() {
    let db = test_engine();
    let mut a = node_of_kind("Solar Eclipse 1919", "Event");
    a.description = Some("tested relativity".into());
    let mut b = node_of_kind("Relativity Paper", "Concept");
    b.description = Some("tested relativity".into());
    db.engine.create_nodes(vec![a, b]).unwrap();

    let results = db
        .engine
        .search_nodes(
            "relativity",
            SearchOptions { node_types: Some(vec!["Event".to_string()]), limit: 20 },
        )
        .unwrap();

    assert_eq!(results.entities.len(), 1);
    assert_eq!(results.entities[0].name, "Solar Eclipse 1919");
}

#[test]
fn search_type_filter_applies_before_the_limit() {
    let db = test_engine();
    // 3 non-matching-kind nodes rank ahead of the 1 wanted-kind node within
    // an unfiltered top-1 window; the type filter must be applied in SQL
    // before LIMIT, not after, or the wanted node never reaches Rust code.
    let mut wanted = node_of_kind("Wanted Event", "Event");
    wanted.description = Some("eclipse eclipse eclipse".into());
    let mut nodes = vec![wanted];
    for i in 0..3 {
        let mut other = node_of_kind(&format!("Other Concept {i}"), "Concept");
        other.description = Some("eclipse eclipse eclipse eclipse".into());
        nodes.push(other);
    }
    db.engine.create_nodes(nodes).unwrap();

    let results = db
        .engine
        .search_nodes("eclipse", SearchOptions { node_types: Some(vec!["Event".to_string()]), limit: 1 })
        .unwrap();

    assert_eq!(results.entities.len(), 1);
    assert_eq!(results.entities[0].name, "Wanted Event");
}

#[test]
fn search_hydrates_edges_among_the_returned_nodes() {
    use noema_core::model::RelationInput;
    use serde_json::Map;

    let db = test_engine();
    let mut a = entity("Linked Star");
    a.description = Some("stellar nucleosynthesis".into());
    let mut b = entity("Linked Nebula");
    b.description = Some("stellar nucleosynthesis".into());
    db.engine.create_nodes(vec![a, b]).unwrap();
    db.engine
        .create_relations(vec![RelationInput {
            from: "Linked Star".to_string(),
            to: "Linked Nebula".to_string(),
            relation_type: "RELATES_TO".to_string(),
            confidence: None,
            weight: None,
            context: None,
            properties: Map::new(),
        }])
        .unwrap();

    let results = db.engine.search_nodes("nucleosynthesis", SearchOptions::default()).unwrap();
    assert_eq!(results.entities.len(), 2);
    assert_eq!(results.relations.len(), 1);
    assert_eq!(results.relations[0].relation_type, "RELATES_TO");
}

#[test]
fn query_with_no_surviving_tokens_returns_empty_not_error() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("Something")]).unwrap();

    let results = db.engine.search_nodes("*** : \"", SearchOptions::default()).unwrap();
    assert!(results.is_empty());
}
