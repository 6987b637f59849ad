use crate::error::GraphDiffError;
use crate::graph::LabeledGraph;
use crate::mapping::GraphMapping;

/// Shared contract for both matching engines (spec. §6).
///
/// Given identical inputs, an implementation must return a `GraphMapping`
/// respecting the label-consistency and injectivity invariants of
/// [`crate::mapping::GraphMapping`].
pub trait GraphDiffEngine {
    fn construct_diff(
        &mut self,
        g1: &LabeledGraph,
        g2: &LabeledGraph,
    ) -> Result<GraphMapping, GraphDiffError>;
}
