//! Edge types — directed, weighted relationships between nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default edge weight when a caller does not supply one (spec.md §3).
pub const DEFAULT_EDGE_WEIGHT: f64 = 0.5;

/// A materialized, directed edge as returned by read operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: i64,
    pub from: String,
    pub to: String,
    pub relation_type: String,
    pub confidence: Option<f64>,
    pub weight: f64,
    pub context: Option<String>,
    pub properties: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Input for `Engine::create_relations`. Uniqueness key is
/// `(from, to, relation_type)`; re-submitting the same key replaces
/// confidence/weight/context/properties (spec.md §3).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationInput {
    pub from: String,
    pub to: String,
    pub relation_type: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl RelationInput {
    pub fn resolved_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_EDGE_WEIGHT)
    }
}

/// Exact key identifying an edge for deletion (spec.md §4.3 `deleteRelations`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationKey {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

/// Case- and convention-insensitive relation-type comparison (spec.md §9):
/// `DERIVED_FROM` and `derivedFrom` name the same relation without either
/// spelling being rewritten on disk, so matching folds case and ignores
/// underscores rather than doing a plain case-fold.
pub fn relation_type_matches(candidate: &str, canonical: &str) -> bool {
    fn normalize(s: &str) -> String {
        s.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
    }
    normalize(candidate) == normalize(canonical)
}
