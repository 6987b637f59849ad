//! The objective both engines maximize.

use std::collections::HashMap;

use crate::graph::LabeledGraph;
use crate::vertex::Vertex;

/// `(edges preserved, vertices matched)`, compared lexicographically:
/// preserving more edges always wins, ties are broken by vertices matched.
/// Field order is significant — `derive(Ord)` compares fields in
/// declaration order, which is exactly this lexicographic rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    pub edges: usize,
    pub vertices: usize,
}

impl Score {
    pub const ZERO: Score = Score { edges: 0, vertices: 0 };
}

/// Scores a candidate partial mapping `g1 -> g2` against the definition in
/// the matching contract: `vertices` counts domain entries mapped to a real
/// target, `edges` counts `G1` edges whose both endpoints are mapped to
/// real targets joined by a corresponding edge in `G2`.
pub fn score(mapping: &HashMap<Vertex, Vertex>, g1: &LabeledGraph, g2: &LabeledGraph) -> Score {
    let mut vertices = 0usize;
    let mut edges = 0usize;

    for (&from, &to) in mapping {
        if from.is_placeholder() || to.is_placeholder() {
            continue;
        }
        vertices += 1;
        for neighbor in g1.out_neighbors(from) {
            let Some(&mapped_neighbor) = mapping.get(&neighbor) else {
                continue;
            };
            if mapped_neighbor.is_real() && g2.has_edge(to, mapped_neighbor) {
                edges += 1;
            }
        }
    }

    Score { edges, vertices }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn score_orders_lexicographically_by_edges_then_vertices() {
        let low_edges_many_vertices = Score { edges: 1, vertices: 10 };
        let high_edges_few_vertices = Score { edges: 2, vertices: 0 };
        assert!(high_edges_few_vertices > low_edges_many_vertices);

        let a = Score { edges: 3, vertices: 1 };
        let b = Score { edges: 3, vertices: 2 };
        assert!(b > a);
    }

    #[test_case(Score { edges: 0, vertices: 0 }, Score { edges: 0, vertices: 1 } ; "vertices break ties")]
    #[test_case(Score { edges: 1, vertices: 0 }, Score { edges: 2, vertices: 0 } ; "edges dominate vertices")]
    #[test_case(Score { edges: 5, vertices: 100 }, Score { edges: 6, vertices: 0 } ; "edges dominate regardless of vertex gap")]
    fn score_b_beats_a(a: Score, b: Score) {
        assert!(b > a);
        assert!(a < b);
    }
}
