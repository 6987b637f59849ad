//! The labeled, rooted, directed graph that both matching engines consume.

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::GraphDiffError;
use crate::vertex::{Label, Vertex};

/// A finite directed graph of real (`occurrence >= 1`) labeled vertices with
/// a distinguished root. Self-loops are permitted; parallel edges are not.
///
/// Built once via [`LabeledGraphBuilder`] and treated as immutable for the
/// rest of its lifetime — both engines hold only shared references to it.
#[derive(Debug, Clone)]
pub struct LabeledGraph {
    inner: DiGraph<Vertex, ()>,
    root: NodeIndex,
    by_label: IndexMap<Label, Vec<NodeIndex>>,
}

impl LabeledGraph {
    /// Number of real vertices.
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Real vertices, in the order they were added to the builder.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.inner.node_indices().map(move |i| self.inner[i])
    }

    pub fn root(&self) -> Vertex {
        self.inner[self.root]
    }

    /// Real out-neighbors of `v`. Empty if `v` is not in this graph.
    pub fn out_neighbors(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        let idx = self.index_of(v);
        idx.into_iter()
            .flat_map(move |idx| self.inner.neighbors_directed(idx, Direction::Outgoing))
            .map(move |i| self.inner[i])
    }

    /// Real in-neighbors of `v`. Empty if `v` is not in this graph.
    pub fn in_neighbors(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        let idx = self.index_of(v);
        idx.into_iter()
            .flat_map(move |idx| self.inner.neighbors_directed(idx, Direction::Incoming))
            .map(move |i| self.inner[i])
    }

    pub fn has_edge(&self, from: Vertex, to: Vertex) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.inner.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Real vertices carrying `label`, in builder insertion order.
    pub fn vertices_with_label(&self, label: Label) -> impl Iterator<Item = Vertex> + '_ {
        self.by_label
            .get(&label)
            .into_iter()
            .flatten()
            .map(move |&i| self.inner[i])
    }

    /// Labels that appear on at least one real vertex, in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.by_label.keys().copied()
    }

    pub(crate) fn index_of(&self, v: Vertex) -> Option<NodeIndex> {
        self.by_label
            .get(&v.label)?
            .iter()
            .copied()
            .find(|&i| self.inner[i] == v)
    }
}

/// Incrementally assembles a [`LabeledGraph`], assigning dense occurrences
/// automatically so callers never have to compute them by hand.
///
/// This is the one piece of "graph construction" this crate owns: it does
/// not parse any external format, it only turns a sequence of
/// `add_vertex`/`add_edge` calls into a validated [`LabeledGraph`].
#[derive(Debug, Default)]
pub struct LabeledGraphBuilder {
    inner: DiGraph<Vertex, ()>,
    lookup: HashMap<Vertex, NodeIndex>,
    next_occurrence: HashMap<Label, u32>,
    root: Option<NodeIndex>,
}

impl LabeledGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fresh real vertex with `label`, assigning the next dense
    /// occurrence for that label.
    pub fn add_vertex(&mut self, label: Label) -> Vertex {
        let occurrence = self.next_occurrence.entry(label).or_insert(0);
        *occurrence += 1;
        let vertex = Vertex::real(label, *occurrence);
        let idx = self.inner.add_node(vertex);
        self.lookup.insert(vertex, idx);
        vertex
    }

    /// Marks `vertex` as the graph's root. Must have been returned by
    /// `add_vertex` on this builder.
    pub fn set_root(&mut self, vertex: Vertex) -> Result<(), GraphDiffError> {
        let idx = *self.lookup.get(&vertex).ok_or_else(|| GraphDiffError::InvalidGraph {
            reason: format!("cannot set root to unknown vertex {vertex}"),
        })?;
        self.root = Some(idx);
        Ok(())
    }

    /// Adds the directed edge `from -> to`. Both endpoints must already
    /// exist; a self-loop is permitted, a parallel edge is not.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex) -> Result<(), GraphDiffError> {
        let &a = self.lookup.get(&from).ok_or_else(|| GraphDiffError::InvalidGraph {
            reason: format!("edge source {from} is not a vertex of this graph"),
        })?;
        let &b = self.lookup.get(&to).ok_or_else(|| GraphDiffError::InvalidGraph {
            reason: format!("edge target {to} is not a vertex of this graph"),
        })?;
        if self.inner.find_edge(a, b).is_some() {
            return Err(GraphDiffError::InvalidGraph {
                reason: format!("parallel edge {from} -> {to}"),
            });
        }
        self.inner.add_edge(a, b, ());
        Ok(())
    }

    /// Validates and finalizes the graph.
    pub fn build(self) -> Result<LabeledGraph, GraphDiffError> {
        let root = self.root.ok_or_else(|| GraphDiffError::InvalidGraph {
            reason: "no root was set".to_string(),
        })?;

        let mut by_label: IndexMap<Label, Vec<NodeIndex>> = IndexMap::new();
        for idx in self.inner.node_indices() {
            let vertex = self.inner[idx];
            if vertex.is_placeholder() {
                return Err(GraphDiffError::InvalidGraph {
                    reason: format!("placeholder vertex {vertex} cannot be a graph member"),
                });
            }
            by_label.entry(vertex.label).or_default().push(idx);
        }
        for (label, occurrences) in &by_label {
            let mut seen: Vec<bool> = vec![false; occurrences.len()];
            for &idx in occurrences {
                let occ = self.inner[idx].occurrence as usize;
                if occ == 0 || occ > occurrences.len() || seen[occ - 1] {
                    return Err(GraphDiffError::InvalidGraph {
                        reason: format!(
                            "label {label} occurrences are not dense over 1..={}",
                            occurrences.len()
                        ),
                    });
                }
                seen[occ - 1] = true;
            }
        }

        Ok(LabeledGraph {
            inner: self.inner,
            root,
            by_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::{assert_all, assert_len_eq_x};

    fn path_graph() -> LabeledGraph {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(2);
        b.set_root(a).unwrap();
        b.add_edge(a, c).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn builder_assigns_dense_occurrences() {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(1);
        b.set_root(a).unwrap();
        let g = b.build().unwrap();
        assert_len_eq_x!(g.vertices_with_label(1).collect::<Vec<_>>(), 2);
        assert_eq!(a.occurrence, 1);
        assert_eq!(c.occurrence, 2);
    }

    #[test]
    fn out_neighbors_follows_direction() {
        let g = path_graph();
        let a = Vertex::real(1, 1);
        let c = Vertex::real(2, 1);
        assert_eq!(g.out_neighbors(a).collect::<Vec<_>>(), vec![c]);
        assert_all!(g.out_neighbors(c), |_v: &Vertex| false);
    }

    #[test]
    fn missing_root_is_invalid() {
        let mut b = LabeledGraphBuilder::new();
        b.add_vertex(1);
        assert!(matches!(b.build(), Err(GraphDiffError::InvalidGraph { .. })));
    }

    #[test]
    fn parallel_edges_rejected() {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        let c = b.add_vertex(2);
        b.set_root(a).unwrap();
        b.add_edge(a, c).unwrap();
        assert!(matches!(b.add_edge(a, c), Err(GraphDiffError::InvalidGraph { .. })));
    }

    #[test]
    fn in_neighbors_follows_direction() {
        let g = path_graph();
        let a = Vertex::real(1, 1);
        let c = Vertex::real(2, 1);
        assert_eq!(g.in_neighbors(c).collect::<Vec<_>>(), vec![a]);
        assert_all!(g.in_neighbors(a), |_v: &Vertex| false);
    }

    #[test]
    fn self_loops_allowed() {
        let mut b = LabeledGraphBuilder::new();
        let a = b.add_vertex(1);
        b.set_root(a).unwrap();
        b.add_edge(a, a).unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.out_neighbors(a).collect::<Vec<_>>(), vec![a]);
    }
}
