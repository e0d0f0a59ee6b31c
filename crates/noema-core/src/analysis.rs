//! Conflict detection and source-reliability-weighted confidence
//! (spec.md §4.9 C9).

use crate::error::Result;
use crate::model::{
    relation_type_matches, ClaimAssessment, ClaimsReport, Conflict, ConflictType,
    EffectiveConfidence, SearchOptions, CANDIDATE_STATUS_THRESHOLD, CLAIM_NODE_TYPES,
    PROVENANCE_RELATION_TYPES,
};
use crate::storage::Engine;

/// Default stored/effective confidence for a node that never declared one.
const DEFAULT_CONFIDENCE: f64 = 1.0;
/// Reliability assumed for a provenance source that carries no
/// `reliability` property of its own (spec.md §4.9).
const DEFAULT_RELIABILITY: f64 = 1.0;

fn is_contradicts(relation_type: &str) -> bool {
    relation_type_matches(relation_type, "CONTRADICTS")
}

fn is_provenance_relation(relation_type: &str) -> bool {
    PROVENANCE_RELATION_TYPES.iter().any(|t| relation_type_matches(relation_type, t))
}

impl Engine {
    /// Explicit `CONTRADICTS` edges between nodes, restricted to `scope`
    /// when given. Endpoint pairs are canonicalized by lexicographic name
    /// order and deduplicated, so a bidirectional A<->B contradiction (two
    /// distinct edge rows) yields one result (spec.md §4.9).
    pub fn detect_conflicts(&self, scope: Option<&[String]>) -> Result<Vec<Conflict>> {
        let edges = self.all_edges(scope)?;
        let mut seen_pairs = std::collections::HashSet::new();
        let mut conflicts = Vec::new();

        for edge in edges {
            if !is_contradicts(&edge.relation_type) {
                continue;
            }
            let pair = if edge.from <= edge.to {
                (edge.from.clone(), edge.to.clone())
            } else {
                (edge.to.clone(), edge.from.clone())
            };
            if !seen_pairs.insert(pair.clone()) {
                continue;
            }
            let (Some(node_a), Some(node_b)) =
                (self.get_node_by_name(&pair.0)?, self.get_node_by_name(&pair.1)?)
            else {
                continue;
            };
            let reason = format!("'{}' contradicts '{}'", node_a.name, node_b.name);
            conflicts.push(Conflict { node_a, node_b, kind: ConflictType::Explicit, reason });
        }

        Ok(conflicts)
    }

    /// Effective confidence: the node's stored confidence scaled by the mean
    /// reliability of its provenance sources (`DERIVED_FROM`/`CITES`
    /// out-edges whose target is a `Source` node — the glossary defines a
    /// provenance edge as one targeting a `Source`, so an edge like a
    /// reasoning chain's `DERIVED_FROM` to a `Thought` does not count here).
    /// A source with no `reliability` property contributes `1.0`; a node
    /// with no qualifying provenance edges returns its stored confidence
    /// unchanged. A node that does not exist reports `{effective: 0,
    /// sources: []}` (spec.md §4.9).
    pub fn compute_effective_confidence(&self, name: &str) -> Result<EffectiveConfidence> {
        let Some(node) = self.get_node_by_name(name)? else {
            return Ok(EffectiveConfidence { effective: 0.0, sources: Vec::new() });
        };
        let stored = node.confidence.unwrap_or(DEFAULT_CONFIDENCE);

        let mut reliabilities = Vec::new();
        let mut sources = Vec::new();

        for edge in self.outgoing_edges(name)? {
            if !is_provenance_relation(&edge.relation_type) {
                continue;
            }
            let Some(target) = self.get_node_by_name(&edge.to)? else { continue };
            if target.node_type != "Source" {
                continue;
            }
            let reliability = target
                .properties
                .get("reliability")
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_RELIABILITY);
            sources.push(edge.to.clone());
            reliabilities.push(reliability);
        }

        if reliabilities.is_empty() {
            return Ok(EffectiveConfidence { effective: stored, sources: Vec::new() });
        }

        let mean_reliability = reliabilities.iter().sum::<f64>() / reliabilities.len() as f64;
        Ok(EffectiveConfidence { effective: stored * mean_reliability, sources })
    }

    /// Assess the claims matched by `query` (or, when `names` is given,
    /// exactly those nodes): for each, its stored and effective confidence,
    /// provenance sources, and any conflicts it participates in.
    pub fn assess_claims(&self, query: &str, names: Option<&[String]>) -> Result<ClaimsReport> {
        let nodes = match names {
            Some(names) => self.get_nodes_by_names(names)?,
            None => {
                let opts = SearchOptions {
                    node_types: Some(CLAIM_NODE_TYPES.iter().map(|t| t.to_string()).collect()),
                    ..SearchOptions::default()
                };
                self.search_nodes(query, opts)?.entities
            }
        };

        if nodes.is_empty() {
            return Ok(ClaimsReport {
                assessments: Vec::new(),
                conflicts: Vec::new(),
                summary: "No matching claims found.".to_string(),
            });
        }

        let mut assessments = Vec::with_capacity(nodes.len());
        let mut all_conflicts = Vec::new();
        let mut seen_conflicts = std::collections::HashSet::new();
        let mut low_confidence_count = 0;

        for node in &nodes {
            let stored_confidence = node.confidence.unwrap_or(DEFAULT_CONFIDENCE);
            let effective = self.compute_effective_confidence(&node.name)?;
            let conflicts = self.detect_conflicts(Some(std::slice::from_ref(&node.name)))?;

            if effective.effective < CANDIDATE_STATUS_THRESHOLD {
                low_confidence_count += 1;
            }

            for conflict in &conflicts {
                let key = (conflict.node_a.name.clone(), conflict.node_b.name.clone());
                if seen_conflicts.insert(key) {
                    all_conflicts.push(conflict.clone());
                }
            }

            assessments.push(ClaimAssessment {
                node: node.clone(),
                stored_confidence,
                effective_confidence: effective.effective,
                sources: effective.sources,
                conflicts,
            });
        }

        let summary = format!(
            "{} claim(s) assessed, {} conflict(s) found, {} low-confidence claim(s)",
            assessments.len(),
            all_conflicts.len(),
            low_confidence_count
        );

        Ok(ClaimsReport { assessments, conflicts: all_conflicts, summary })
    }
}
