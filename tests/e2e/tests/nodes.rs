use noema_e2e::{entity, node_of_kind, test_engine};
use serde_json::json;

#[test]
fn create_then_fetch_round_trips_fixed_fields() {
    let db = test_engine();
    let mut input = entity("Ada Lovelace");
    input.description = Some("mathematician".into());
    input.confidence = Some(0.9);

    let created = db.engine.create_nodes(vec![input]).unwrap();
    assert_eq!(created.len(), 1);

    let fetched = db.engine.get_node_by_name("Ada Lovelace").unwrap().unwrap();
    assert_eq!(fetched.description.as_deref(), Some("mathematician"));
    assert_eq!(fetched.confidence, Some(0.9));
    assert_eq!(fetched.status, noema_core::model::NodeStatus::Active);
}

#[test]
fn unknown_node_kind_is_rejected() {
    let db = test_engine();
    let input = node_of_kind("Mystery", "NotAKind");
    assert!(db.engine.create_nodes(vec![input]).is_err());
}

#[test]
fn low_confidence_node_gets_candidate_status() {
    let db = test_engine();
    let mut input = entity("Shaky Claim");
    input.confidence = Some(0.2);
    db.engine.create_nodes(vec![input]).unwrap();

    let node = db.engine.get_node_by_name("Shaky Claim").unwrap().unwrap();
    assert_eq!(node.status, noema_core::model::NodeStatus::Candidate);
}

#[test]
fn kind_specific_properties_land_in_properties_blob() {
    let db = test_engine();
    let mut input = node_of_kind("Gravity Hypothesis", "ScientificInsight");
    input.extra.insert("hypothesis".into(), json!("mass bends spacetime"));
    input.extra.insert("reliability".into(), json!(0.8));
    db.engine.create_nodes(vec![input]).unwrap();

    let node = db.engine.get_node_by_name("Gravity Hypothesis").unwrap().unwrap();
    assert_eq!(node.properties.get("hypothesis"), Some(&json!("mass bends spacetime")));
    assert!(node.search_text.contains("mass bends spacetime"));
}

#[test]
fn upsert_replaces_scalars_but_accumulates_observations() {
    let db = test_engine();
    let mut first = entity("Turing");
    first.description = Some("first description".into());
    first.observations = vec!["observation one".into()];
    db.engine.create_nodes(vec![first]).unwrap();

    let mut second = entity("Turing");
    second.description = Some("revised description".into());
    second.observations = vec!["observation two".into()];
    db.engine.create_nodes(vec![second]).unwrap();

    let node = db.engine.get_node_by_name("Turing").unwrap().unwrap();
    assert_eq!(node.description.as_deref(), Some("revised description"));
    assert_eq!(node.observations.len(), 2);
    assert_eq!(node.observations[0].content, "observation one");
    assert_eq!(node.observations[1].content, "observation two");
}

#[test]
fn deleting_a_node_cascades_its_observations() {
    let db = test_engine();
    let mut input = entity("Ephemeral");
    input.observations = vec!["note".into()];
    db.engine.create_nodes(vec![input]).unwrap();

    db.engine.delete_nodes(&["Ephemeral".to_string()]).unwrap();
    assert!(db.engine.get_node_by_name("Ephemeral").unwrap().is_none());
}

#[test]
fn add_observations_appends_to_existing_node() {
    let db = test_engine();
    db.engine.create_nodes(vec![entity("Curie")]).unwrap();

    db.engine
        .add_observations(vec![noema_core::model::ObservationBatch {
            node: "Curie".into(),
            contents: vec!["discovered radium".into(), "discovered polonium".into()],
        }])
        .unwrap();

    let node = db.engine.get_node_by_name("Curie").unwrap().unwrap();
    assert_eq!(node.observations.len(), 2);
}

#[test]
fn missing_node_lookup_returns_none_not_error() {
    let db = test_engine();
    assert!(db.engine.get_node_by_name("Nobody").unwrap().is_none());
}
