use noema_e2e::{entity, test_engine};

#[test]
fn alias_is_stored_lowercase_but_canonical_name_keeps_casing() {
    let db = test_engine();
    let mut input = entity("United States of America");
    input.aliases = vec!["USA".into(), "the States".into()];
    db.engine.create_nodes(vec![input]).unwrap();

    assert_eq!(
        db.engine.resolve_alias("USA").unwrap().as_deref(),
        Some("United States of America")
    );
    assert_eq!(
        db.engine.resolve_alias("UsA").unwrap().as_deref(),
        Some("United States of America"),
        "alias resolution is case-insensitive on the alias side"
    );
}

#[test]
fn get_node_by_name_falls_back_through_alias() {
    let db = test_engine();
    let mut input = entity("United States of America");
    input.aliases = vec!["USA".into()];
    db.engine.create_nodes(vec![input]).unwrap();

    let node = db.engine.get_node_by_name("usa").unwrap().unwrap();
    assert_eq!(node.name, "United States of America");
}

#[test]
fn unresolvable_alias_returns_none_not_error() {
    let db = test_engine();
    assert!(db.engine.resolve_alias("nonexistent").unwrap().is_none());
}
