//! Row codec (spec.md §4.2) — splits a typed node input into fixed columns
//! plus a structured `properties` blob, and reverses that split on read.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::model::{Node, NodeInput, NodeStatus, Observation};

/// The fixed columns extracted from a [`NodeInput`], ready to bind into the
/// `nodes` table. `properties_json` and `search_text` are already fully
/// resolved strings.
pub struct EncodedNode {
    pub name: String,
    pub node_type: String,
    pub sub_type: Option<String>,
    pub status: NodeStatus,
    pub description: Option<String>,
    pub statement: Option<String>,
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub properties_json: String,
    pub search_text: String,
}

/// Fields folded into `search_text`, beyond the fixed `name`/`description`/
/// `statement`/`content` columns — looked up in the properties blob since
/// they are kind-specific (spec.md §4.2).
const SEARCH_TEXT_PROPERTY_KEYS: [&str; 4] =
    ["thoughtContent", "definition", "hypothesis", "conclusion"];

/// Split a [`NodeInput`] into fixed columns and a properties blob.
///
/// All fields not recognized as fixed columns (already captured in
/// `input.extra` via `#[serde(flatten)]`) are placed into `properties`
/// verbatim. An empty node name is rejected as malformed input.
pub fn encode_node(input: &NodeInput) -> Result<EncodedNode> {
    if input.name.trim().is_empty() {
        return Err(EngineError::Validation("node name must not be empty".into()));
    }

    let confidence = input.resolved_confidence();
    let content = input.resolved_content();
    let status = NodeStatus::from_confidence(confidence);

    let search_text = build_search_text(
        &input.name,
        input.description.as_deref(),
        input.statement.as_deref(),
        content.as_deref(),
        &input.extra,
    );

    let properties_json = serde_json::to_string(&input.extra)
        .map_err(|e| EngineError::Validation(format!("failed to encode properties: {e}")))?;

    Ok(EncodedNode {
        name: input.name.clone(),
        node_type: input.entity_type.clone(),
        sub_type: input.sub_type.clone(),
        status,
        description: input.description.clone(),
        statement: input.statement.clone(),
        content,
        confidence,
        properties_json,
        search_text,
    })
}

/// Build the denormalized `search_text` column: the space-joined
/// concatenation of whichever of name/description/statement/content plus
/// the kind-specific thoughtContent/definition/hypothesis/conclusion
/// properties are present (spec.md §4.2).
pub fn build_search_text(
    name: &str,
    description: Option<&str>,
    statement: Option<&str>,
    content: Option<&str>,
    extra: &Map<String, Value>,
) -> String {
    let mut parts: Vec<&str> = vec![name];
    parts.extend(description);
    parts.extend(statement);
    parts.extend(content);
    for key in SEARCH_TEXT_PROPERTY_KEYS {
        if let Some(value) = extra.get(key).and_then(Value::as_str) {
            parts.push(value);
        }
    }
    parts.join(" ")
}

/// Reconstitute a [`Node`] from its fixed columns plus the properties blob.
/// Observations are attached separately by the caller (spec.md §4.2).
#[allow(clippy::too_many_arguments)]
pub fn decode_node(
    name: String,
    node_type: String,
    sub_type: Option<String>,
    status: String,
    description: Option<String>,
    statement: Option<String>,
    content: Option<String>,
    confidence: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    properties_json: String,
    search_text: String,
) -> Result<Node> {
    let properties: Map<String, Value> = serde_json::from_str(&properties_json)
        .map_err(|e| EngineError::Validation(format!("failed to decode properties: {e}")))?;

    let status = match status.as_str() {
        "candidate" => NodeStatus::Candidate,
        _ => NodeStatus::Active,
    };

    Ok(Node {
        name,
        node_type,
        sub_type,
        status,
        description,
        statement,
        content,
        confidence,
        created_at,
        updated_at,
        properties,
        search_text,
        observations: Vec::new(),
    })
}

/// Attach observations (already ordered by insertion) to a decoded node.
pub fn with_observations(mut node: Node, observations: Vec<Observation>) -> Node {
    node.observations = observations;
    node
}
