//! Fractal Tree Library - Self-Similar Binary Trees and Their Dimension
//!
//! This library grows a deterministic binary fractal tree from a handful of
//! geometric parameters and estimates the fractal dimension of the resulting
//! curve with a circle-covering count.
//!
//! # Architecture
//!
//! - **[`Segment`]**: One oriented line with a derived end point
//! - **[`FractalTree`]**: Arena of segments with a parent → children table
//! - **Growth**: Breadth-first expansion, one full generation per call
//! - **Traversal**: Pre-order walk driving a [`SegmentVisitor`]
//! - **Covering**: [`CoveringCounter`] visitor and multi-radius averaging
//! - **[`TreeParams`]**: Parameter set and construction entry point
//!
//! # Example
//! ```
//! use fractal_tree_lib::{TreeParams, estimate_dimension_multi};
//!
//! let tree = TreeParams { depth: 6, ..TreeParams::default() }.build()?;
//! assert_eq!(tree.leaf_count(), 32);
//!
//! let report = estimate_dimension_multi(&tree, &[1e-2, 1e-3])?;
//! assert!(report.mean > 1.0);
//! # Ok::<(), fractal_tree_lib::FractalError>(())
//! ```
//!
//! # Complexity
//!
//! - **Growth**: O(2^D) segments for depth D, each built in O(1)
//! - **Traversal**: O(S) for S segments, stack bounded by D
//! - **Estimate**: O(S × E) for E radii, radii measured in parallel

mod covering;
mod growth;
mod params;
mod segment;
mod traversal;
mod tree;
pub mod utils;

// Public API exports
pub use covering::{
    CoveringCounter, DEFAULT_EPSILONS, DimensionReport, DimensionSample, estimate_dimension,
    estimate_dimension_multi, sample_dimension,
};
pub use growth::{MAX_DEPTH, child_segments};
pub use params::{TreeParams, build_tree};
pub use segment::{Orientation, Segment, SegmentId, Side};
pub use traversal::{PreOrder, SegmentVisitor};
pub use tree::{FractalTree, GrowthRule, SegmentRecord};

/// Error types for tree construction and dimension estimation
#[derive(Debug, thiserror::Error)]
pub enum FractalError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid tree operation: segment {segment} already has children")]
    InvalidTreeOperation { segment: SegmentId },

    #[error("Degenerate estimate: covering count {count} at epsilon {epsilon}")]
    DegenerateEstimate { epsilon: f64, count: i64 },
}

pub type Result<T> = std::result::Result<T, FractalError>;
