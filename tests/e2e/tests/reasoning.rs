use noema_core::model::{ReasoningChainInput, ReasoningStepInput, StepType};
use noema_e2e::test_engine;
use serde_json::Map;

fn chain_input(name: &str) -> ReasoningChainInput {
    ReasoningChainInput {
        name: name.to_string(),
        description: Some("why the sky is blue".into()),
        conclusion: Some("Rayleigh scattering".into()),
        confidence_score: Some(0.8),
        methodology: "deductive".into(),
        domain: Some("physics".into()),
        tags: vec!["optics".into()],
        source_thought: None,
        alternative_conclusions_considered: vec![],
    }
}

fn step(name: &str, content: &str, step_type: StepType) -> ReasoningStepInput {
    ReasoningStepInput {
        name: name.to_string(),
        content: content.to_string(),
        step_type,
        confidence: Some(0.9),
        evidence_type: None,
        supporting_references: vec![],
        alternatives: vec![],
        counterarguments: vec![],
        assumptions: vec![],
        formal_notation: None,
        extra: Map::new(),
    }
}

#[test]
fn reasoning_chain_links_steps_with_has_step_and_next() {
    let db = test_engine();
    let steps = vec![
        step("Step1", "light scatters off molecules", StepType::Premise),
        step("Step2", "shorter wavelengths scatter more", StepType::Inference),
        step("Step3", "blue light dominates the scattered sky", StepType::Conclusion),
    ];

    let chain_node = db.engine.create_reasoning_chain(chain_input("SkyBlueChain"), steps).unwrap();
    assert_eq!(chain_node.name, "SkyBlueChain");

    let fragment = db.engine.get_reasoning_chain("SkyBlueChain").unwrap();
    assert_eq!(fragment.entities.len(), 4, "chain node plus 3 steps");

    let has_step_count = fragment.relations.iter().filter(|e| e.relation_type == "HAS_STEP").count();
    assert_eq!(has_step_count, 3);

    let next_edges: Vec<_> = fragment.relations.iter().filter(|e| e.relation_type == "NEXT").collect();
    assert_eq!(next_edges.len(), 2);
    assert!(next_edges.iter().all(|e| e.weight == 0.8));
}

#[test]
fn reasoning_chain_stamps_step_ordering_and_chain_size_properties() {
    let db = test_engine();
    let steps = vec![
        step("Step1", "light scatters off molecules", StepType::Premise),
        step("Step2", "shorter wavelengths scatter more", StepType::Inference),
        step("Step3", "blue light dominates the scattered sky", StepType::Conclusion),
    ];

    let chain_node = db.engine.create_reasoning_chain(chain_input("OrderedChain"), steps).unwrap();
    assert_eq!(chain_node.properties.get("numberOfSteps").and_then(|v| v.as_u64()), Some(3));

    let fragment = db.engine.get_reasoning_chain("OrderedChain").unwrap();
    // entities[0] is the chain node itself; the rest must come back ordered
    // by their stored stepNumber, not by incidental edge-return order.
    let step_names: Vec<_> = fragment.entities[1..].iter().map(|n| n.name.as_str()).collect();
    assert_eq!(step_names, vec!["Step1", "Step2", "Step3"]);

    for (i, step_node) in fragment.entities[1..].iter().enumerate() {
        assert_eq!(
            step_node.properties.get("stepNumber").and_then(|v| v.as_u64()),
            Some(i as u64 + 1)
        );
        assert_eq!(
            step_node.properties.get("chainName").and_then(|v| v.as_str()),
            Some("OrderedChain")
        );
    }
}

#[test]
fn reasoning_chain_rejects_empty_step_list() {
    let db = test_engine();
    assert!(db.engine.create_reasoning_chain(chain_input("EmptyChain"), vec![]).is_err());
}

#[test]
fn reasoning_chain_links_source_thought_via_derived_from() {
    let db = test_engine();
    db.engine
        .create_nodes(vec![noema_e2e::node_of_kind("OriginalThought", "Thought")])
        .unwrap();

    let mut input = chain_input("DerivedChain");
    input.source_thought = Some("OriginalThought".into());
    db.engine
        .create_reasoning_chain(input, vec![step("OnlyStep", "a single step", StepType::Premise)])
        .unwrap();

    let report = db.engine.validate_provenance("DerivedChain").unwrap();
    // validate_provenance only governs Thought nodes; the chain itself is
    // not a Thought, so it is trivially valid regardless of the edge.
    assert!(report.valid);

    let fragment = db.engine.explore_context(&["DerivedChain".to_string()], Default::default()).unwrap();
    assert!(fragment
        .relations
        .iter()
        .any(|e| e.relation_type == "DERIVED_FROM" && e.to == "OriginalThought"));
}

#[test]
fn find_reasoning_chains_matches_by_topic() {
    let db = test_engine();
    db.engine
        .create_reasoning_chain(
            chain_input("SkyBlueChain"),
            vec![step("Step1", "light scatters off molecules", StepType::Premise)],
        )
        .unwrap();

    let fragment = db.engine.find_reasoning_chains(&["Rayleigh".to_string()], 10).unwrap();
    assert!(fragment.entities.iter().any(|n| n.name == "SkyBlueChain"));
}

#[test]
fn find_reasoning_chains_limit_zero_means_unlimited() {
    let db = test_engine();
    for i in 0..3 {
        db.engine
            .create_reasoning_chain(
                chain_input(&format!("RayleighChain{i}")),
                vec![step(&format!("Step{i}"), "a single step", StepType::Premise)],
            )
            .unwrap();
    }

    let fragment = db.engine.find_reasoning_chains(&["Rayleigh".to_string()], 0).unwrap();
    assert_eq!(fragment.entities.len(), 3);
}
