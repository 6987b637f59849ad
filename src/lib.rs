//! Approximate maximum common labeled subgraph mapping.
//!
//! Two directed graphs with (possibly repeated) vertex labels; the crate
//! searches for the best-scoring label-consistent partial injection between
//! their vertex sets, where "best" means preserving as many edges as
//! possible and, among ties, matching as many vertices as possible.
//!
//! Two engines implement [`GraphDiffEngine`]: [`BaselineEnumerator`] is
//! exact but exponential, useful as a correctness oracle on small graphs;
//! [`AnnealingSearch`] is a simulated-annealing local search suited to
//! larger ones.

pub mod annealing;
pub mod baseline;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod label_index;
pub mod mapping;
pub mod scorer;
pub mod vertex;

pub use annealing::AnnealingSearch;
pub use baseline::BaselineEnumerator;
pub use config::{AnnealingConfig, EnumerationConfig};
pub use engine::GraphDiffEngine;
pub use error::GraphDiffError;
pub use graph::{LabeledGraph, LabeledGraphBuilder};
pub use label_index::LabelIndex;
pub use mapping::GraphMapping;
pub use scorer::Score;
pub use vertex::{Label, Occurrence, Vertex};
