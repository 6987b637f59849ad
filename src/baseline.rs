//! Exact enumerator: materializes every label-consistent partial injection
//! and returns an argmax under [`crate::scorer::Score`]. A correctness
//! oracle for [`crate::annealing::AnnealingSearch`], not meant for large
//! graphs — see [`EnumerationConfig`].

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::config::EnumerationConfig;
use crate::engine::GraphDiffEngine;
use crate::error::GraphDiffError;
use crate::graph::LabeledGraph;
use crate::label_index::LabelIndex;
use crate::mapping::GraphMapping;
use crate::vertex::Vertex;

/// How often a full progress line is emitted once the candidate count
/// crosses into "large enough that per-candidate trace logging would flood
/// output".
const LOG_DEBUG_INTERVAL: usize = 1_000;

pub struct BaselineEnumerator {
    config: EnumerationConfig,
    cancellation: Option<Box<dyn Fn() -> bool>>,
}

impl Default for BaselineEnumerator {
    fn default() -> Self {
        BaselineEnumerator { config: EnumerationConfig::default(), cancellation: None }
    }
}

impl BaselineEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EnumerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a cooperative cancellation predicate, checked once before
    /// the search begins and once per scored candidate thereafter.
    pub fn with_cancellation(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.cancellation = Some(Box::new(predicate));
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(|f| f())
    }
}

impl GraphDiffEngine for BaselineEnumerator {
    fn construct_diff(
        &mut self,
        g1: &LabeledGraph,
        g2: &LabeledGraph,
    ) -> Result<GraphMapping, GraphDiffError> {
        if self.is_cancelled() {
            return Err(GraphDiffError::Cancelled);
        }

        let i1_original = LabelIndex::build(g1);
        let i2_original = LabelIndex::build(g2);
        let mut i1 = i1_original.clone();
        let mut i2 = i2_original.clone();
        i1.extend_with(&i2_original);
        i2.extend_with(&i1_original);

        let mut per_label_assignments: Vec<Vec<Vec<(Vertex, Vertex)>>> = Vec::new();
        for label in i1.labels() {
            let s = i1.get(label);
            let t = i2.get(label);
            per_label_assignments.push(label_local_assignments(s, t));
        }

        let total: Option<usize> = per_label_assignments
            .iter()
            .try_fold(1usize, |acc, choices| acc.checked_mul(choices.len()));
        let exceeds_limit = match total {
            Some(n) => n > self.config.candidate_limit,
            None => true,
        };
        if exceeds_limit {
            let candidates_considered = total.unwrap_or(usize::MAX);
            log::warn!(
                "baseline enumeration would score {candidates_considered} candidates, over the limit of {}",
                self.config.candidate_limit
            );
            return Err(GraphDiffError::ResourceExhausted {
                candidates_considered,
                limit: self.config.candidate_limit,
            });
        }

        let mut best: Option<GraphMapping> = None;
        let mut scored = 0usize;

        if per_label_assignments.is_empty() {
            best = Some(GraphMapping::empty());
        } else {
            for combo in per_label_assignments
                .iter()
                .map(|choices| choices.iter())
                .multi_cartesian_product()
            {
                let mut forward: HashMap<Vertex, Vertex> = HashMap::new();
                for pairs in combo {
                    forward.extend(pairs.iter().copied());
                }
                let candidate = GraphMapping::new(forward, g1, g2)?;
                scored += 1;
                if scored % LOG_DEBUG_INTERVAL == 0 {
                    log::debug!("baseline enumerator scored {scored} candidates so far");
                }
                log::trace!("candidate {scored}: score={:?}", candidate.score());

                if best.as_ref().is_none_or(|b| candidate.score() > b.score()) {
                    best = Some(candidate);
                }

                if self.is_cancelled() {
                    log::warn!("baseline enumeration cancelled after {scored} candidates");
                    break;
                }
            }
        }

        let best = best.unwrap_or_else(GraphMapping::empty);
        log::info!("baseline enumerator finished: {scored} candidates scored, best score {:?}", best.score());
        Ok(best)
    }
}

/// Enumerates every way to pair each position of `t` with either a distinct,
/// previously-unused element of `s` or with "no real partner" — i.e. every
/// injective partial function from `t`'s positions into `s`. Returns, for
/// each such assignment, only the pairs where a real `s` element was used
/// (placeholder pairings are dropped, per the matching contract).
///
/// Deduplicates by pair-set equality: distinct choices of *which* position
/// was left unpaired can coincide once placeholder-only positions are
/// dropped, and they must collapse to one candidate rather than being
/// scored twice.
fn label_local_assignments(s: &[Vertex], t: &[Vertex]) -> Vec<Vec<(Vertex, Vertex)>> {
    let mut results: HashSet<Vec<(Vertex, Vertex)>> = HashSet::new();
    let mut used = vec![false; s.len()];
    let mut current: Vec<(Vertex, Vertex)> = Vec::new();
    backtrack(0, s, t, &mut used, &mut current, &mut results);
    results.into_iter().collect()
}

fn backtrack(
    pos: usize,
    s: &[Vertex],
    t: &[Vertex],
    used: &mut [bool],
    current: &mut Vec<(Vertex, Vertex)>,
    results: &mut HashSet<Vec<(Vertex, Vertex)>>,
) {
    if pos == t.len() {
        results.insert(current.clone());
        return;
    }
    // leave this position unpaired
    backtrack(pos + 1, s, t, used, current, results);
    // or pair it with each still-unused real vertex
    for i in 0..s.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push((s[i], t[pos]));
        backtrack(pos + 1, s, t, used, current, results);
        current.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LabeledGraphBuilder;

    fn single_edge_graph() -> LabeledGraph {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(2);
        b.set_root(a).unwrap();
        b.add_edge(a, c).unwrap();
        b.build().unwrap()
    }

    fn reversed_edge_graph() -> LabeledGraph {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(2);
        b.set_root(c).unwrap();
        b.add_edge(c, a).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn identity_scenario() {
        let g = single_edge_graph();
        let mapping = BaselineEnumerator::new().construct_diff(&g, &g).unwrap();
        assert_eq!(mapping.score().edges, 1);
        assert_eq!(mapping.score().vertices, 2);
    }

    #[test]
    fn disjoint_labels_scenario() {
        let mut b1 = LabeledGraphBuilder::new();
        let a = b1.add_vertex(1);
        b1.set_root(a).unwrap();
        let g1 = b1.build().unwrap();

        let mut b2 = LabeledGraphBuilder::new();
        let c = b2.add_vertex(2);
        b2.set_root(c).unwrap();
        let g2 = b2.build().unwrap();

        let mapping = BaselineEnumerator::new().construct_diff(&g1, &g2).unwrap();
        assert_eq!(mapping.score(), crate::scorer::Score::ZERO);
    }

    #[test]
    fn placeholder_absorption_scenario() {
        let mut b1 = LabeledGraphBuilder::new();
        let a = b1.add_vertex(1);
        b1.add_vertex(1);
        b1.add_vertex(1);
        b1.set_root(a).unwrap();
        let g1 = b1.build().unwrap();

        let mut b2 = LabeledGraphBuilder::new();
        let x = b2.add_vertex(1);
        b2.add_vertex(1);
        b2.set_root(x).unwrap();
        let g2 = b2.build().unwrap();

        let mapping = BaselineEnumerator::new().construct_diff(&g1, &g2).unwrap();
        assert_eq!(mapping.score(), crate::scorer::Score { edges: 0, vertices: 2 });
    }

    #[test]
    fn edge_direction_matters_scenario() {
        let g1 = single_edge_graph();
        let g2 = reversed_edge_graph();
        let mapping = BaselineEnumerator::new().construct_diff(&g1, &g2).unwrap();
        assert_eq!(mapping.score(), crate::scorer::Score { edges: 0, vertices: 2 });
    }

    #[test]
    fn empty_graphs_score_zero() {
        let mut b = LabeledGraphBuilder::new();
        let r = b.add_vertex(0);
        b.set_root(r).unwrap();
        let g = b.build().unwrap();
        // only the root, no edges, no repeats: trivially matches itself.
        let mapping = BaselineEnumerator::new().construct_diff(&g, &g).unwrap();
        assert_eq!(mapping.score().edges, 0);
    }

    #[test]
    fn resource_exhausted_ceiling_is_respected() {
        let mut b = LabeledGraphBuilder::new();
        let r = b.add_vertex(1);
        for _ in 0..5 {
            b.add_vertex(1);
        }
        b.set_root(r).unwrap();
        let g = b.build().unwrap();

        let config = EnumerationConfig { candidate_limit: 1 };
        let result = BaselineEnumerator::new().with_config(config).construct_diff(&g, &g);
        assert!(matches!(result, Err(GraphDiffError::ResourceExhausted { .. })));
    }

    #[test]
    fn symmetric_score_matches_both_directions() {
        let mut b1 = LabeledGraphBuilder::new();
        let a = b1.add_vertex(1);
        let c = b1.add_vertex(1);
        b1.set_root(a).unwrap();
        b1.add_edge(a, c).unwrap();
        let g1 = b1.build().unwrap();

        let mut b2 = LabeledGraphBuilder::new();
        let x = b2.add_vertex(1);
        let y = b2.add_vertex(1);
        b2.set_root(x).unwrap();
        b2.add_edge(x, y).unwrap();
        let g2 = b2.build().unwrap();

        let forward = BaselineEnumerator::new().construct_diff(&g1, &g2).unwrap();
        let backward = BaselineEnumerator::new().construct_diff(&g2, &g1).unwrap();
        assert_eq!(forward.score(), backward.score());
    }
}
