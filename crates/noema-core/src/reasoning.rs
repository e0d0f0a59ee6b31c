//! Reasoning-chain subgraph materialization (spec.md §4.7 C7).
//!
//! A `ReasoningChain` is a container node; each `ReasoningStep` is a node in
//! its own right. The two are linked by fixed-weight edges rather than a
//! nested structure, so the chain is queryable with the same traversal and
//! search primitives as everything else in the graph.

use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::model::{
    GraphFragment, Node, NodeInput, RelationInput, ReasoningChainInput, ReasoningStepInput,
};
use crate::storage::Engine;

/// Weight on the chain -> step containment edge.
const HAS_STEP_WEIGHT: f64 = 1.0;
/// Weight on the step -> step ordering edge.
const NEXT_WEIGHT: f64 = 0.8;
/// Weight on the chain -> source-thought provenance edge.
const DERIVED_FROM_WEIGHT: f64 = 0.9;

impl Engine {
    /// Create a `ReasoningChain` node, one `ReasoningStep` node per entry in
    /// `steps`, and the `HAS_STEP`/`NEXT`/`DERIVED_FROM` edges linking them.
    /// Returns the chain node.
    pub fn create_reasoning_chain(
        &self,
        chain: ReasoningChainInput,
        steps: Vec<ReasoningStepInput>,
    ) -> Result<Node> {
        if steps.is_empty() {
            return Err(EngineError::Validation(
                "a reasoning chain must have at least one step".into(),
            ));
        }

        let chain_input = chain_to_node_input(&chain, steps.len());
        let step_inputs: Vec<NodeInput> = steps
            .iter()
            .enumerate()
            .map(|(i, step)| step_to_node_input(step, &chain.name, i as u32 + 1))
            .collect();
        let step_names: Vec<String> = step_inputs.iter().map(|s| s.name.clone()).collect();

        let mut all_inputs = vec![chain_input.clone()];
        all_inputs.extend(step_inputs);
        let created = self.create_nodes(all_inputs)?;

        let mut relations = Vec::new();
        for step_name in &step_names {
            relations.push(RelationInput {
                from: chain.name.clone(),
                to: step_name.clone(),
                relation_type: "HAS_STEP".to_string(),
                confidence: None,
                weight: Some(HAS_STEP_WEIGHT),
                context: None,
                properties: Map::new(),
            });
        }
        for pair in step_names.windows(2) {
            relations.push(RelationInput {
                from: pair[0].clone(),
                to: pair[1].clone(),
                relation_type: "NEXT".to_string(),
                confidence: None,
                weight: Some(NEXT_WEIGHT),
                context: None,
                properties: Map::new(),
            });
        }
        if let Some(source_thought) = &chain.source_thought {
            relations.push(RelationInput {
                from: chain.name.clone(),
                to: source_thought.clone(),
                relation_type: "DERIVED_FROM".to_string(),
                confidence: None,
                weight: Some(DERIVED_FROM_WEIGHT),
                context: None,
                properties: Map::new(),
            });
        }
        if !relations.is_empty() {
            self.create_relations(relations)?;
        }

        created
            .into_iter()
            .find(|n| n.name == chain.name)
            .ok_or_else(|| EngineError::Database(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Fetch a reasoning chain's node plus every `ReasoningStep` reachable
    /// from it via `HAS_STEP`, and the edges among them.
    pub fn get_reasoning_chain(&self, name: &str) -> Result<GraphFragment> {
        let Some(chain_node) = self.get_node_by_name(name)? else {
            return Ok(GraphFragment::default());
        };

        let has_step_edges: Vec<_> = self
            .outgoing_edges(name)?
            .into_iter()
            .filter(|e| e.relation_type == "HAS_STEP")
            .collect();

        let mut names: Vec<String> = vec![chain_node.name.clone()];
        names.extend(has_step_edges.iter().map(|e| e.to.clone()));

        let mut entities = self.get_nodes_by_names(&names)?;
        let relations = self.edges_among(&names)?;

        // Keep the chain node first, then order steps by their stored
        // `stepNumber` property (spec.md §4.7), not incidental edge order.
        let step_number = |n: &Node| -> u64 {
            n.properties.get("stepNumber").and_then(Value::as_u64).unwrap_or(u64::MAX)
        };
        entities[1..].sort_by_key(step_number);

        Ok(GraphFragment::new(entities, relations))
    }

    /// Search for `ReasoningChain` nodes matching any of `topics`, deduped
    /// by name, capped at `limit` (`limit == 0` means unlimited, matching
    /// `SearchOptions`'s convention).
    pub fn find_reasoning_chains(&self, topics: &[String], limit: u32) -> Result<GraphFragment> {
        let mut seen = std::collections::HashSet::new();
        let mut entities = Vec::new();
        let is_full = |count: usize| limit != 0 && count as u32 >= limit;

        for topic in topics {
            let fragment = self.search_nodes(
                topic,
                crate::model::SearchOptions {
                    node_types: Some(vec!["ReasoningChain".to_string()]),
                    limit,
                },
            )?;
            for node in fragment.entities {
                if seen.insert(node.name.clone()) {
                    entities.push(node);
                }
                if is_full(entities.len()) {
                    break;
                }
            }
            if is_full(entities.len()) {
                break;
            }
        }

        let names: Vec<String> = entities.iter().map(|n| n.name.clone()).collect();
        let relations = self.edges_among(&names)?;
        Ok(GraphFragment::new(entities, relations))
    }
}

fn chain_to_node_input(chain: &ReasoningChainInput, num_steps: usize) -> NodeInput {
    let mut extra = Map::new();
    extra.insert("numberOfSteps".into(), Value::Number(num_steps.into()));
    extra.insert("methodology".into(), Value::String(chain.methodology.clone()));
    if let Some(domain) = &chain.domain {
        extra.insert("domain".into(), Value::String(domain.clone()));
    }
    if !chain.tags.is_empty() {
        extra.insert(
            "tags".into(),
            Value::Array(chain.tags.iter().cloned().map(Value::String).collect()),
        );
    }
    if let Some(source_thought) = &chain.source_thought {
        extra.insert("sourceThought".into(), Value::String(source_thought.clone()));
    }
    if !chain.alternative_conclusions_considered.is_empty() {
        extra.insert(
            "alternativeConclusionsConsidered".into(),
            Value::Array(
                chain
                    .alternative_conclusions_considered
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }

    NodeInput {
        name: chain.name.clone(),
        entity_type: "ReasoningChain".to_string(),
        sub_type: None,
        description: chain.description.clone(),
        statement: chain.conclusion.clone(),
        content: None,
        confidence: chain.confidence_score,
        confidence_score: None,
        observations: Vec::new(),
        aliases: Vec::new(),
        extra,
    }
}

fn step_to_node_input(step: &ReasoningStepInput, chain_name: &str, step_number: u32) -> NodeInput {
    let mut extra = step.extra.clone();
    extra.insert("stepNumber".into(), Value::Number(step_number.into()));
    extra.insert("chainName".into(), Value::String(chain_name.to_string()));
    extra.insert("stepType".into(), Value::String(step.step_type.as_str().to_string()));
    if let Some(evidence_type) = &step.evidence_type {
        extra.insert("evidenceType".into(), Value::String(evidence_type.clone()));
    }
    if !step.supporting_references.is_empty() {
        extra.insert(
            "supportingReferences".into(),
            Value::Array(step.supporting_references.iter().cloned().map(Value::String).collect()),
        );
    }
    if !step.alternatives.is_empty() {
        extra.insert(
            "alternatives".into(),
            Value::Array(step.alternatives.iter().cloned().map(Value::String).collect()),
        );
    }
    if !step.counterarguments.is_empty() {
        extra.insert(
            "counterarguments".into(),
            Value::Array(step.counterarguments.iter().cloned().map(Value::String).collect()),
        );
    }
    if !step.assumptions.is_empty() {
        extra.insert(
            "assumptions".into(),
            Value::Array(step.assumptions.iter().cloned().map(Value::String).collect()),
        );
    }
    if let Some(formal_notation) = &step.formal_notation {
        extra.insert("formalNotation".into(), Value::String(formal_notation.clone()));
    }

    NodeInput {
        name: step.name.clone(),
        entity_type: "ReasoningStep".to_string(),
        sub_type: None,
        description: None,
        statement: None,
        content: Some(step.content.clone()),
        confidence: step.confidence,
        confidence_score: None,
        observations: Vec::new(),
        aliases: Vec::new(),
        extra,
    }
}
