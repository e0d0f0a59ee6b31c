//! Observation batch input for `Engine::add_observations`.

use serde::{Deserialize, Serialize};

/// One node's worth of observations to append. Observations accumulate —
/// they are never deduplicated or truncated (spec.md §3).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationBatch {
    pub node: String,
    pub contents: Vec<String>,
}
