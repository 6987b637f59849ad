//! Per-label vertex buckets, the structure both engines use to keep
//! candidate mappings label-consistent.

use indexmap::IndexMap;

use crate::graph::LabeledGraph;
use crate::vertex::{Label, Vertex};

/// A `label -> ordered sequence of vertex identities` index built from one
/// graph. The sequence starts out containing only real vertices (in the
/// source graph's iteration order) and may later contain placeholders once
/// [`pad_against`](LabelIndex::pad_against) is called.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    buckets: IndexMap<Label, Vec<Vertex>>,
}

impl LabelIndex {
    /// Buckets every real vertex of `graph` under its label.
    pub fn build(graph: &LabeledGraph) -> Self {
        let mut buckets: IndexMap<Label, Vec<Vertex>> = IndexMap::new();
        for v in graph.vertices() {
            buckets.entry(v.label).or_default().push(v);
        }
        LabelIndex { buckets }
    }

    /// Labels with a (possibly empty) bucket.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.buckets.keys().copied()
    }

    pub fn get(&self, label: Label) -> &[Vertex] {
        self.buckets.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ensures every label present in `other` has an entry here, adding an
    /// empty bucket for labels this index has never seen.
    pub fn extend_with(&mut self, other: &LabelIndex) {
        for label in other.labels() {
            self.buckets.entry(label).or_default();
        }
    }

    /// For each label, appends placeholder vertices to this index's bucket
    /// until it is at least as long as `other`'s bucket for that label.
    pub fn pad_against(&mut self, other: &LabelIndex) {
        for label in other.labels() {
            let target_len = other.get(label).len();
            let bucket = self.buckets.entry(label).or_default();
            while bucket.len() < target_len {
                bucket.push(Vertex::placeholder(label));
            }
        }
    }
}
