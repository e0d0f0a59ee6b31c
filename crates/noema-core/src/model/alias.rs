//! Alias mapping — lowercased alternative names resolving to a canonical node.

use serde::{Deserialize, Serialize};

/// Default match score applied when a caller does not supply one.
pub const DEFAULT_MATCH_SCORE: f64 = 1.0;

/// A stored alias row. The alias string is always lowercased on write;
/// `canonical_name` preserves the original node name casing exactly
/// (spec.md §9 — alias lookup is asymmetric).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub alias: String,
    pub canonical_name: String,
    pub match_score: f64,
}
