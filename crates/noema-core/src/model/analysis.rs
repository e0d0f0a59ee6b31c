//! Result types for validation, conflict detection, and confidence
//! computation (spec.md §4.8, §4.9).

use serde::{Deserialize, Serialize};

use super::node::Node;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Relation types treated as provenance edges (spec.md glossary), matched
/// case-insensitively at query time but never rewritten on disk.
pub const PROVENANCE_RELATION_TYPES: [&str; 2] = ["DERIVED_FROM", "CITES"];

/// Node kinds eligible for claim assessment (spec.md §4.9).
pub const CLAIM_NODE_TYPES: [&str; 3] = ["Proposition", "ScientificInsight", "Thought"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Explicit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub node_a: Node,
    pub node_b: Node,
    #[serde(rename = "type")]
    pub kind: ConflictType,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfidence {
    pub effective: f64,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAssessment {
    pub node: Node,
    pub stored_confidence: f64,
    pub effective_confidence: f64,
    pub sources: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsReport {
    pub assessments: Vec<ClaimAssessment>,
    pub conflicts: Vec<Conflict>,
    pub summary: String,
}
