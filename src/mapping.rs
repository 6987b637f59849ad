//! The partial injection returned by both matching engines.

use std::collections::{HashMap, HashSet};

use crate::error::GraphDiffError;
use crate::graph::LabeledGraph;
use crate::scorer::{self, Score};
use crate::vertex::Vertex;

/// A label-consistent partial injection `M: V(G1) -> V(G2) u {placeholders}`.
///
/// Immutable once built: its [`score`](GraphMapping::score) is computed at
/// construction and never recomputed. Placeholder targets may repeat across
/// distinct domain vertices (they all mean "no match"); real targets may
/// not.
#[derive(Debug, Clone)]
pub struct GraphMapping {
    forward: HashMap<Vertex, Vertex>,
    score: Score,
}

impl GraphMapping {
    /// An empty mapping with score `(0, 0)`, returned for empty graphs and
    /// as the baseline "nothing matched" result.
    pub fn empty() -> Self {
        GraphMapping { forward: HashMap::new(), score: Score::ZERO }
    }

    /// Validates `forward` against `g1`/`g2` and computes its score.
    ///
    /// Every key must be a real vertex of `g1`. Every value must share its
    /// key's label, and be either a placeholder or a real vertex of `g2`;
    /// real values must be pairwise distinct across the whole mapping.
    pub fn new(
        forward: HashMap<Vertex, Vertex>,
        g1: &LabeledGraph,
        g2: &LabeledGraph,
    ) -> Result<Self, GraphDiffError> {
        let mut seen_targets: HashSet<Vertex> = HashSet::new();
        for (&from, &to) in &forward {
            if from.is_placeholder() || g1.index_of(from).is_none() {
                return Err(GraphDiffError::InvalidGraph {
                    reason: format!("mapping domain vertex {from} is not a real vertex of g1"),
                });
            }
            if from.label != to.label {
                return Err(GraphDiffError::InvalidGraph {
                    reason: format!("mapping pairs {from} with {to}: labels differ"),
                });
            }
            if to.is_real() {
                if g2.index_of(to).is_none() {
                    return Err(GraphDiffError::InvalidGraph {
                        reason: format!("mapping target {to} is not a real vertex of g2"),
                    });
                }
                if !seen_targets.insert(to) {
                    return Err(GraphDiffError::InvalidGraph {
                        reason: format!("mapping target {to} is assigned to more than one vertex"),
                    });
                }
            }
        }

        let score = scorer::score(&forward, g1, g2);
        Ok(GraphMapping { forward, score })
    }

    /// Builds a mapping from parts already known to satisfy the
    /// label-consistency and injectivity invariants, skipping the
    /// O(vertices + edges) validation and rescoring [`GraphMapping::new`]
    /// does. For engines (namely [`crate::annealing::AnnealingSearch`]) that
    /// maintain those invariants structurally and compute `score`
    /// incrementally themselves.
    pub(crate) fn from_parts(forward: HashMap<Vertex, Vertex>, score: Score) -> Self {
        GraphMapping { forward, score }
    }

    /// The target of `v`, if `v` is in this mapping's domain. Returns the
    /// placeholder target as-is if that is what was recorded (a "no match"
    /// result is still `Some`, distinguishable by [`Vertex::is_placeholder`]).
    pub fn apply(&self, v: Vertex) -> Option<Vertex> {
        self.forward.get(&v).copied()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn domain(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.forward.keys().copied()
    }

    /// The reverse mapping `V(G2) -> V(G1)`, dropping any pair whose target
    /// is a placeholder (a placeholder has no real pre-image). Used when an
    /// engine internally swaps `G1`/`G2` and needs to translate a
    /// caller-supplied initial mapping to match.
    pub fn inverted(&self) -> HashMap<Vertex, Vertex> {
        self.forward
            .iter()
            .filter(|(_, to)| to.is_real())
            .map(|(&from, &to)| (to, from))
            .collect()
    }
}

impl PartialEq for GraphMapping {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}
impl Eq for GraphMapping {}

impl PartialOrd for GraphMapping {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for GraphMapping {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score.cmp(&other.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LabeledGraphBuilder;

    fn edge_graph() -> LabeledGraph {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(2);
        b.set_root(a).unwrap();
        b.add_edge(a, c).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn identity_mapping_scores_one_edge_two_vertices() {
        let g = edge_graph();
        let mut forward = HashMap::new();
        forward.insert(Vertex::real(1, 1), Vertex::real(1, 1));
        forward.insert(Vertex::real(2, 1), Vertex::real(2, 1));
        let mapping = GraphMapping::new(forward, &g, &g).unwrap();
        assert_eq!(mapping.score(), Score { edges: 1, vertices: 2 });
    }

    #[test]
    fn label_mismatch_is_rejected() {
        let g = edge_graph();
        let mut forward = HashMap::new();
        forward.insert(Vertex::real(1, 1), Vertex::real(2, 1));
        assert!(GraphMapping::new(forward, &g, &g).is_err());
    }

    #[test]
    fn duplicate_real_targets_are_rejected() {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(1);
        b.set_root(a).unwrap();
        let g1 = b.build().unwrap();

        let mut b2 = LabeledGraphBuilder::new();
        let t = b2.add_vertex(1);
        b2.set_root(t).unwrap();
        let g2 = b2.build().unwrap();

        let mut forward = HashMap::new();
        forward.insert(a, t);
        forward.insert(c, t);
        assert!(GraphMapping::new(forward, &g1, &g2).is_err());
    }

    #[test]
    fn shared_placeholder_targets_are_allowed() {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(1);
        b.set_root(a).unwrap();
        let g1 = b.build().unwrap();
        let mut b2 = LabeledGraphBuilder::new();
        let r = b2.add_vertex(99);
        b2.set_root(r).unwrap();
        let g2 = b2.build().unwrap();

        let mut forward = HashMap::new();
        forward.insert(a, Vertex::placeholder(1));
        forward.insert(c, Vertex::placeholder(1));
        assert_eq!(
            GraphMapping::new(forward, &g1, &g2).unwrap().score(),
            Score::ZERO
        );
    }
}
