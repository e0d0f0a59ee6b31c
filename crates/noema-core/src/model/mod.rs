//! Core data model — nodes, edges, observations, aliases, reasoning chains,
//! and the shared graph-fragment/option types the query surface returns.

mod alias;
mod analysis;
mod edge;
mod graph;
mod node;
mod observation;
mod reasoning;

pub use alias::{Alias, DEFAULT_MATCH_SCORE};
pub use analysis::{
    ClaimAssessment, ClaimsReport, Conflict, ConflictType, EffectiveConfidence, ProvenanceReport,
    CLAIM_NODE_TYPES, PROVENANCE_RELATION_TYPES,
};
pub use edge::{relation_type_matches, Edge, RelationInput, RelationKey, DEFAULT_EDGE_WEIGHT};
pub use graph::{
    ExploreOptions, GraphFragment, SearchOptions, TemporalDirection, TemporalOptions,
    DEFAULT_SEARCH_LIMIT, DEFAULT_SHORTEST_PATH_MAX_DEPTH,
};
pub use node::{
    Node, NodeInput, NodeKind, NodeStatus, Observation, CANDIDATE_STATUS_THRESHOLD,
};
pub use observation::ObservationBatch;
pub use reasoning::{ReasoningChainInput, ReasoningStepInput, StepType};
