//! Provenance validation (spec.md §4.8 C8).

use crate::error::Result;
use crate::model::{relation_type_matches, ProvenanceReport};
use crate::storage::Engine;

/// A `Thought` node must carry at least one outgoing provenance edge back to
/// whatever it was derived from. The relation type is matched
/// case-insensitively (`DERIVED_FROM` or `derivedFrom`) without rewriting
/// the stored value (spec.md §9).
fn is_derived_from(relation_type: &str) -> bool {
    relation_type_matches(relation_type, "DERIVED_FROM")
}

impl Engine {
    /// Check that `name`, if it is a `Thought` node, has an outgoing
    /// provenance edge. Nodes of any other kind are trivially valid — the
    /// rule is scoped to `Thought` (spec.md §4.8).
    pub fn validate_provenance(&self, name: &str) -> Result<ProvenanceReport> {
        let Some(node) = self.get_node_by_name(name)? else {
            return Ok(ProvenanceReport {
                valid: false,
                issues: vec![format!("node '{name}' does not exist")],
            });
        };

        if node.node_type != "Thought" {
            return Ok(ProvenanceReport { valid: true, issues: Vec::new() });
        }

        let has_provenance_edge = self
            .outgoing_edges(&node.name)?
            .iter()
            .any(|e| is_derived_from(&e.relation_type));

        if has_provenance_edge {
            Ok(ProvenanceReport { valid: true, issues: Vec::new() })
        } else {
            Ok(ProvenanceReport {
                valid: false,
                issues: vec![format!(
                    "thought '{name}' has no outgoing derivedFrom/DERIVED_FROM edge"
                )],
            })
        }
    }
}
