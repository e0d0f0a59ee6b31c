//! Node types — the fundamental unit of the knowledge graph.
//!
//! A node is uniquely identified by its `name`. Fixed, kind-independent
//! attributes live as typed struct fields; everything else kind-specific
//! (hypothesis, evidence, reliability, startDate, ...) lives in the
//! `properties` blob. See [`crate::codec`] for the split.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};

/// The closed set of node kinds this engine understands.
///
/// Unlike a free-form type tag, this is a closed enum: an unrecognized
/// kind string is rejected as malformed input (spec error taxonomy item 2)
/// rather than silently coerced to a default, since no external
/// schema-versioning concern applies here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entity,
    Event,
    Concept,
    Attribute,
    Proposition,
    Emotion,
    Agent,
    ScientificInsight,
    Law,
    Location,
    Thought,
    ReasoningChain,
    ReasoningStep,
    Source,
    EmotionalEvent,
}

impl NodeKind {
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Entity,
        NodeKind::Event,
        NodeKind::Concept,
        NodeKind::Attribute,
        NodeKind::Proposition,
        NodeKind::Emotion,
        NodeKind::Agent,
        NodeKind::ScientificInsight,
        NodeKind::Law,
        NodeKind::Location,
        NodeKind::Thought,
        NodeKind::ReasoningChain,
        NodeKind::ReasoningStep,
        NodeKind::Source,
        NodeKind::EmotionalEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Entity => "Entity",
            NodeKind::Event => "Event",
            NodeKind::Concept => "Concept",
            NodeKind::Attribute => "Attribute",
            NodeKind::Proposition => "Proposition",
            NodeKind::Emotion => "Emotion",
            NodeKind::Agent => "Agent",
            NodeKind::ScientificInsight => "ScientificInsight",
            NodeKind::Law => "Law",
            NodeKind::Location => "Location",
            NodeKind::Thought => "Thought",
            NodeKind::ReasoningChain => "ReasoningChain",
            NodeKind::ReasoningStep => "ReasoningStep",
            NodeKind::Source => "Source",
            NodeKind::EmotionalEvent => "EmotionalEvent",
        }
    }

    /// Parse from the exact, case-sensitive kind name. Node kinds are not
    /// matched case-insensitively — only relation types are (spec.md §9).
    pub fn parse(s: &str) -> Result<Self> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngineError::Validation(format!("unknown node kind: {s}")))
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trust tier derived from stored confidence (spec.md §3 invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Candidate,
}

/// Threshold below which a node's status becomes `candidate`.
///
/// Open question in spec.md §9: drawn from the reference test suite; the
/// core treats it as a constant rather than exposing it as configuration.
pub const CANDIDATE_STATUS_THRESHOLD: f64 = 0.5;

impl NodeStatus {
    pub fn from_confidence(confidence: Option<f64>) -> Self {
        match confidence {
            Some(c) if c < CANDIDATE_STATUS_THRESHOLD => NodeStatus::Candidate,
            _ => NodeStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Candidate => "candidate",
        }
    }
}

/// A single append-only observation attached to a node, ordered by
/// insertion time (tiebreak on the monotonic `id` column, spec.md §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A fully materialized node as returned by read operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub node_type: String,
    pub sub_type: Option<String>,
    pub status: NodeStatus,
    pub description: Option<String>,
    pub statement: Option<String>,
    pub content: Option<String>,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Kind-specific fields not covered by the fixed columns above.
    pub properties: Map<String, Value>,
    pub search_text: String,
    pub observations: Vec<Observation>,
}

/// Input for `Engine::create_nodes`.
///
/// Carries the fixed, kind-independent fields explicitly; every other field
/// supplied by the caller (hypothesis, evidence, reliability, startDate,
/// emotionalValence, ...) is captured by `extra` and placed into the
/// `properties` blob verbatim — this is the row codec's split point
/// (spec.md §4.2).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInput {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statement: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Fallback for `confidence` when the caller used the alternate name
    /// (spec.md §4.2).
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeInput {
    /// Resolved confidence after the `confidenceScore` fallback.
    pub fn resolved_confidence(&self) -> Option<f64> {
        self.confidence.or(self.confidence_score)
    }

    /// Resolved content after the `thoughtContent` fallback (spec.md §9
    /// open question: `content` is primary, `thoughtContent` is the
    /// fallback).
    pub fn resolved_content(&self) -> Option<String> {
        self.content.clone().or_else(|| {
            self.extra
                .get("thoughtContent")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }
}
