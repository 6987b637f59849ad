use std::fmt::{Display, Formatter};

/// The label type: a nonnegative integer tag, not unique within a graph.
pub type Label = u32;

/// The occurrence type: disambiguates vertices sharing a label. `0` is
/// reserved for the placeholder sentinel and never appears on a real vertex.
pub type Occurrence = u32;

/// Identity of a vertex within one graph: a `(label, occurrence)` pair.
///
/// `occurrence == 0` denotes a placeholder — a synthetic "unmatched slot for
/// this label" used by [`crate::label_index::LabelIndex`] padding and by
/// [`crate::mapping::GraphMapping`] targets. Placeholders never belong to a
/// [`crate::graph::LabeledGraph`]'s vertex set and never participate in
/// edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub label: Label,
    pub occurrence: Occurrence,
}

impl Vertex {
    /// A real vertex. `occurrence` must be `>= 1`; callers that need the
    /// dense-occurrence invariant enforced should go through
    /// [`crate::graph::LabeledGraphBuilder::add_vertex`] instead of calling
    /// this directly.
    pub const fn real(label: Label, occurrence: Occurrence) -> Self {
        Vertex { label, occurrence }
    }

    /// The placeholder vertex for `label`, meaning "no match".
    pub const fn placeholder(label: Label) -> Self {
        Vertex { label, occurrence: 0 }
    }

    pub const fn is_placeholder(self) -> bool {
        self.occurrence == 0
    }

    pub const fn is_real(self) -> bool {
        !self.is_placeholder()
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_placeholder() {
            write!(f, "{}#_", self.label)
        } else {
            write!(f, "{}#{}", self.label, self.occurrence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_all;

    #[test]
    fn placeholder_is_never_real() {
        let p = Vertex::placeholder(7);
        assert!(p.is_placeholder());
        assert!(!p.is_real());
        assert_eq!(p.occurrence, 0);
    }

    #[test]
    fn real_vertices_report_real() {
        let reals = [Vertex::real(1, 1), Vertex::real(1, 2), Vertex::real(2, 1)];
        assert_all!(reals.iter(), |v: &Vertex| v.is_real());
    }
}
