//! Graph fragments — the common `{entities, relations}` result shape shared
//! by search, traversal, and reasoning-subgraph operations (spec.md §6).

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::node::Node;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphFragment {
    pub entities: Vec<Node>,
    pub relations: Vec<Edge>,
}

impl GraphFragment {
    pub fn new(entities: Vec<Node>, relations: Vec<Edge>) -> Self {
        Self { entities, relations }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}

/// Search/exploration/temporal options shared by the §4.5–§4.6 read
/// operations. Each operation uses the subset it needs.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub node_types: Option<Vec<String>>,
    pub limit: u32,
}

impl SearchOptions {
    pub fn with_limit(limit: u32) -> Self {
        Self { node_types: None, limit }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { node_types: None, limit: DEFAULT_SEARCH_LIMIT }
    }
}

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct ExploreOptions {
    pub max_depth: u32,
    pub min_weight: f64,
    pub include_types: Option<Vec<String>>,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            min_weight: 0.0,
            include_types: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalDirection {
    Forward,
    Backward,
    Both,
}

#[derive(Debug, Clone)]
pub struct TemporalOptions {
    pub direction: TemporalDirection,
    pub max_events: u32,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            direction: TemporalDirection::Both,
            max_events: 10,
        }
    }
}

pub const DEFAULT_SHORTEST_PATH_MAX_DEPTH: u32 = 6;
