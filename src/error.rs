use thiserror::Error;

/// Errors surfaced by graph construction, mapping construction, and the two
/// matching engines.
///
/// Construction-time validation (of a [`crate::graph::LabeledGraph`] via its
/// builder, or of an initial mapping passed to [`crate::annealing::AnnealingSearch`])
/// fails fast with [`InvalidGraph`](GraphDiffError::InvalidGraph) or
/// [`IncompatibleInitialMapping`](GraphDiffError::IncompatibleInitialMapping)
/// before any search begins. [`ResourceExhausted`](GraphDiffError::ResourceExhausted)
/// and [`Cancelled`](GraphDiffError::Cancelled) are both "no work happened"
/// errors: once an engine has scored at least one candidate, it always
/// returns its best-effort mapping in `Ok`, even if cancelled or over
/// budget on a later candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphDiffError {
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    #[error("incompatible initial mapping: {reason}")]
    IncompatibleInitialMapping { reason: String },

    #[error("enumeration would score {candidates_considered} candidates, over the limit of {limit}")]
    ResourceExhausted {
        candidates_considered: usize,
        limit: usize,
    },

    #[error("cancelled before any candidate was scored")]
    Cancelled,
}
