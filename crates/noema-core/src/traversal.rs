//! Graph traversal (spec.md §4.6 C6): weighted neighborhood expansion,
//! directed temporal-chain walks, and undirected shortest path.

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::model::{
    relation_type_matches, Edge, ExploreOptions, GraphFragment, TemporalDirection, TemporalOptions,
};
use crate::storage::Engine;

/// Relation types treated as temporal ordering edges, matched
/// case-insensitively without rewriting the stored value (spec.md §9).
const TEMPORAL_RELATION_TYPES: [&str; 7] =
    ["FOLLOWS", "CAUSES", "NEXT", "AFTER", "BEFORE", "PREVIOUS", "CAUSED_BY"];

fn is_temporal_relation(relation_type: &str) -> bool {
    TEMPORAL_RELATION_TYPES.iter().any(|t| relation_type_matches(relation_type, t))
}

impl Engine {
    /// Undirected, weight-pruned neighborhood expansion outward from `seeds`
    /// (spec.md §4.6). Both edge directions are followed; an edge below
    /// `opts.min_weight`, or whose relation type is excluded by
    /// `opts.include_types`, is not traversed.
    pub fn explore_context(&self, seeds: &[String], opts: ExploreOptions) -> Result<GraphFragment> {
        let mut visited_nodes: HashSet<String> = seeds.iter().cloned().collect();
        let mut visited_edges: Vec<Edge> = Vec::new();
        let mut visited_edge_ids: HashSet<i64> = HashSet::new();
        let mut frontier: Vec<String> = seeds.to_vec();

        for _ in 0..opts.max_depth {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();

            for node in &frontier {
                let mut edges = self.outgoing_edges(node)?;
                edges.extend(self.incoming_edges(node)?);

                for edge in edges {
                    if edge.weight < opts.min_weight {
                        continue;
                    }
                    if let Some(types) = &opts.include_types {
                        if !types.iter().any(|t| t == &edge.relation_type) {
                            continue;
                        }
                    }

                    let neighbor = if &edge.from == node { edge.to.clone() } else { edge.from.clone() };

                    if visited_edge_ids.insert(edge.id) {
                        visited_edges.push(edge);
                    }
                    if visited_nodes.insert(neighbor.clone()) {
                        next_frontier.push(neighbor);
                    }
                }
            }

            frontier = next_frontier;
        }

        let names: Vec<String> = visited_nodes.into_iter().collect();
        let entities = self.get_nodes_by_names(&names)?;
        Ok(GraphFragment::new(entities, visited_edges))
    }

    /// Directed temporal-chain walk starting at `start`, following only the
    /// fixed set of temporal relation types (spec.md §4.6).
    pub fn get_temporal_sequence(&self, start: &str, opts: TemporalOptions) -> Result<GraphFragment> {
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut edges = Vec::new();
        let mut names = vec![start.to_string()];

        if matches!(opts.direction, TemporalDirection::Forward | TemporalDirection::Both) {
            walk_temporal(self, start, true, opts.max_events, &mut visited, &mut edges, &mut names)?;
        }
        if matches!(opts.direction, TemporalDirection::Backward | TemporalDirection::Both) {
            walk_temporal(self, start, false, opts.max_events, &mut visited, &mut edges, &mut names)?;
        }

        let entities = self.get_nodes_by_names(&names)?;
        Ok(GraphFragment::new(entities, edges))
    }

    /// Undirected shortest path from `from` to `to`, breadth-first over both
    /// edge directions (same reachability rule as `explore_context`),
    /// bounded by `max_depth` hops. Returns an empty fragment (not an error)
    /// when no path exists within the bound (spec.md §7 item 4).
    pub fn find_shortest_path(&self, from: &str, to: &str, max_depth: u32) -> Result<GraphFragment> {
        if from == to {
            let entities = self.get_nodes_by_names(std::slice::from_ref(&from.to_string()))?;
            return Ok(GraphFragment::new(entities, Vec::new()));
        }

        let mut visited: HashSet<String> = HashSet::from([from.to_string()]);
        let mut predecessor: std::collections::HashMap<String, (String, Edge)> = Default::default();
        let mut queue: VecDeque<(String, u32)> = VecDeque::from([(from.to_string(), 0)]);
        let mut found = false;

        'search: while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let mut edges = self.outgoing_edges(&current)?;
            edges.extend(self.incoming_edges(&current)?);

            for edge in edges {
                let neighbor = if edge.from == current { edge.to.clone() } else { edge.from.clone() };
                if !visited.insert(neighbor.clone()) {
                    continue;
                }
                predecessor.insert(neighbor.clone(), (current.clone(), edge.clone()));
                if neighbor == to {
                    found = true;
                    break 'search;
                }
                queue.push_back((neighbor, depth + 1));
            }
        }

        if !found {
            return Ok(GraphFragment::default());
        }

        let mut names = vec![to.to_string()];
        let mut path_edges = Vec::new();
        let mut current = to.to_string();
        while let Some((prev, edge)) = predecessor.get(&current) {
            path_edges.push(edge.clone());
            names.push(prev.clone());
            current = prev.clone();
            if current == from {
                break;
            }
        }
        names.reverse();
        path_edges.reverse();

        let entities = self.get_nodes_by_names(&names)?;
        Ok(GraphFragment::new(entities, path_edges))
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_temporal(
    engine: &Engine,
    start: &str,
    forward: bool,
    max_events: u32,
    visited: &mut HashSet<String>,
    edges: &mut Vec<Edge>,
    names: &mut Vec<String>,
) -> Result<()> {
    let mut current = start.to_string();
    let mut steps = 0;

    while steps < max_events {
        let candidates = if forward {
            engine.outgoing_edges(&current)?
        } else {
            engine.incoming_edges(&current)?
        };

        let next = candidates
            .into_iter()
            .filter(|e| is_temporal_relation(&e.relation_type))
            .find(|e| {
                let neighbor = if forward { &e.to } else { &e.from };
                !visited.contains(neighbor)
            });

        let Some(edge) = next else { break };
        let neighbor = if forward { edge.to.clone() } else { edge.from.clone() };

        visited.insert(neighbor.clone());
        names.push(neighbor.clone());
        edges.push(edge);
        current = neighbor;
        steps += 1;
    }

    Ok(())
}
