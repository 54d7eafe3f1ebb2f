//! Circle-covering estimate of the fractal dimension of a tree
//!
//! ## Algorithm
//! 1. Walk the tree in pre-order with a [`CoveringCounter`] of radius `ε`.
//! 2. Each segment contributes `ceil(coverable / 2ε)` circles, where the
//!    coverable length is `length - ε` for leaves and `length - 2ε` for
//!    inner segments (ends shared with a neighbouring circle are excluded).
//! 3. The root has no predecessor to share its start with, so the finished
//!    count is corrected once with `count -= 1`.
//! 4. `D ≈ ln(count) / ln(1/ε)`.
//!
//! The root correction is a heuristic and is not exact for every shape.
//! Several radii can be combined; the result is the arithmetic mean of the
//! per-radius dimensions, each computed from its own independent traversal.

use crate::{FractalError, FractalTree, Result, Segment, SegmentId, SegmentVisitor};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Radii used when the caller does not provide any
pub const DEFAULT_EPSILONS: &[f64] = &[1e-2, 1e-3, 1e-4];

/// Per-segment circle counts at or above this do not fit an `i64`
const COUNT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Running circle count for a single radius
///
/// Created fresh for each radius, fed by one traversal, read once.
#[derive(Debug, Clone)]
pub struct CoveringCounter {
    epsilon: f64,
    count: i64,
    finalized: bool,
    overflowed: bool,
}

/// Dimension measured at one radius
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionSample {
    pub epsilon: f64,
    /// Corrected circle count
    pub count: i64,
    pub dimension: f64,
}

/// Mean dimension over several radii, with the individual samples
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionReport {
    pub mean: f64,
    /// One sample per radius, in the order the radii were given
    pub samples: Vec<DimensionSample>,
}

impl CoveringCounter {
    /// Create an empty counter for radius `epsilon`
    ///
    /// Fails with [`FractalError::InvalidParameter`] unless `epsilon` is
    /// positive and finite. It should also be small next to the shortest
    /// leaf, which is not checked.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(FractalError::InvalidParameter(format!(
                "epsilon must be positive and finite, got {epsilon}"
            )));
        }
        Ok(Self {
            epsilon,
            count: 0,
            finalized: false,
            overflowed: false,
        })
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Current count (corrected once [`CoveringCounter::finalize`] ran)
    #[inline]
    pub fn count(&self) -> i64 {
        self.count
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// True once the running count no longer fits an `i64`
    #[inline]
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Circles needed for one segment, `None` if that does not fit an `i64`
    #[inline]
    pub fn contribution(&self, segment: &Segment) -> Option<i64> {
        let shared_ends = if segment.is_leaf() { 1.0 } else { 2.0 };
        let coverable = segment.length() - shared_ends * self.epsilon;
        let circles = (coverable / (2.0 * self.epsilon)).ceil();
        if circles.is_finite() && circles < COUNT_LIMIT {
            Some(circles as i64)
        } else {
            None
        }
    }

    /// Apply the root correction; later calls do nothing
    pub fn finalize(&mut self) -> i64 {
        if !self.finalized {
            self.count -= 1;
            self.finalized = true;
        }
        self.count
    }

    /// Turn the finished count into a dimension estimate
    ///
    /// Finalizes first if needed. Fails with
    /// [`FractalError::InvalidParameter`] when `ε` is so small that the count
    /// overflowed, and with [`FractalError::DegenerateEstimate`] when the
    /// count is not positive or when `ln(1/ε)` is zero.
    pub fn into_sample(mut self) -> Result<DimensionSample> {
        if self.overflowed {
            return Err(FractalError::InvalidParameter(format!(
                "epsilon {} is too small: the covering count overflows",
                self.epsilon
            )));
        }
        let count = self.finalize();
        let log_scale = (1.0 / self.epsilon).ln();
        if count <= 0 || log_scale == 0.0 {
            return Err(FractalError::DegenerateEstimate {
                epsilon: self.epsilon,
                count,
            });
        }

        Ok(DimensionSample {
            epsilon: self.epsilon,
            count,
            dimension: (count as f64).ln() / log_scale,
        })
    }
}

impl SegmentVisitor for CoveringCounter {
    #[inline]
    fn visit(&mut self, _id: SegmentId, segment: &Segment) {
        debug_assert!(!self.finalized, "counter reused after finalize");
        match self
            .contribution(segment)
            .and_then(|circles| self.count.checked_add(circles))
        {
            Some(count) => self.count = count,
            None => self.overflowed = true,
        }
    }
}

/// Measure the dimension of `tree` at a single radius
///
/// A tree that never branched has no meaningful dimension and always
/// yields [`FractalError::DegenerateEstimate`].
pub fn sample_dimension(tree: &FractalTree, epsilon: f64) -> Result<DimensionSample> {
    let mut counter = CoveringCounter::new(epsilon)?;
    tree.traverse(&mut counter);

    if !tree.has_branches() && !counter.is_overflowed() {
        return Err(FractalError::DegenerateEstimate {
            epsilon,
            count: counter.finalize(),
        });
    }

    let sample = counter.into_sample()?;
    tracing::trace!(
        epsilon = sample.epsilon,
        count = sample.count,
        dimension = sample.dimension,
        "covering sample"
    );
    Ok(sample)
}

/// Dimension estimate of `tree` at a single radius
pub fn estimate_dimension(tree: &FractalTree, epsilon: f64) -> Result<f64> {
    sample_dimension(tree, epsilon).map(|sample| sample.dimension)
}

/// Mean dimension estimate over several radii
///
/// Each radius is measured independently (in parallel); the mean is taken
/// over the dimensions, not the counts. Fails with
/// [`FractalError::InvalidParameter`] for an empty list, and with the
/// error of a failing radius if any fails.
pub fn estimate_dimension_multi(tree: &FractalTree, epsilons: &[f64]) -> Result<DimensionReport> {
    #[cfg(feature = "profiling")]
    profiling::scope!("covering::estimate_dimension_multi");

    if epsilons.is_empty() {
        return Err(FractalError::InvalidParameter(
            "at least one epsilon is required".to_string(),
        ));
    }

    let samples: Vec<DimensionSample> = epsilons
        .par_iter()
        .map(|&epsilon| sample_dimension(tree, epsilon))
        .collect::<Result<Vec<_>>>()?;

    let mean = samples.iter().map(|s| s.dimension).sum::<f64>() / samples.len() as f64;
    tracing::info!(
        radii = samples.len(),
        segments = tree.segment_count(),
        mean,
        "estimated fractal dimension"
    );

    Ok(DimensionReport { mean, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeParams;

    fn classic_tree(depth: u32) -> FractalTree {
        TreeParams {
            depth,
            ..TreeParams::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_counter_rejects_bad_epsilon() {
        assert!(matches!(
            CoveringCounter::new(0.0),
            Err(FractalError::InvalidParameter(_))
        ));
        assert!(matches!(
            CoveringCounter::new(-1e-3),
            Err(FractalError::InvalidParameter(_))
        ));
        assert!(matches!(
            CoveringCounter::new(f64::NAN),
            Err(FractalError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_leaf_and_inner_contributions() {
        let mut tree = classic_tree(1);
        let counter = CoveringCounter::new(0.01).unwrap();
        // Leaf of length 1: ceil(0.99 / 0.02) = 50
        assert_eq!(counter.contribution(tree.root()), Some(50));

        tree.grow_one_generation().unwrap();
        // Inner segment of length 1: ceil(0.98 / 0.02) = 49
        assert_eq!(counter.contribution(tree.root()), Some(49));
    }

    #[test]
    fn test_finalize_applies_once() {
        let mut counter = CoveringCounter::new(0.1).unwrap();
        let tree = classic_tree(2);
        tree.traverse(&mut counter);
        let raw = counter.count();
        assert_eq!(counter.finalize(), raw - 1);
        assert_eq!(counter.finalize(), raw - 1);
        assert!(counter.is_finalized());
    }

    #[test]
    fn test_depth_two_counts() {
        let tree = classic_tree(2);
        let sample = sample_dimension(&tree, 0.01).unwrap();
        // 49 (root) + 30 + 30 (leaves of length 0.6) - 1
        assert_eq!(sample.count, 108);
        assert!((sample.dimension - 108f64.ln() / 100f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_depth_six_counts() {
        let tree = classic_tree(6);
        let counts: Vec<i64> = DEFAULT_EPSILONS
            .iter()
            .map(|&eps| sample_dimension(&tree, eps).unwrap().count)
            .collect();
        assert_eq!(counts, vec![478, 4940, 49624]);
    }

    #[test]
    fn test_single_segment_is_degenerate() {
        let tree = classic_tree(1);
        assert!(matches!(
            estimate_dimension(&tree, 0.01),
            Err(FractalError::DegenerateEstimate { .. })
        ));
    }

    #[test]
    fn test_large_epsilon_is_degenerate() {
        let tree = classic_tree(6);
        assert!(matches!(
            estimate_dimension(&tree, 0.5),
            Err(FractalError::DegenerateEstimate { .. })
        ));
    }

    #[test]
    fn test_tiny_epsilon_overflow_is_an_error() {
        let tree = classic_tree(3);
        // Each segment fits an i64 but the sum does not
        assert!(matches!(
            estimate_dimension(&tree, 1e-19),
            Err(FractalError::InvalidParameter(_))
        ));
        // A single segment already does not fit
        assert!(matches!(
            estimate_dimension(&tree, 1e-300),
            Err(FractalError::InvalidParameter(_))
        ));
        assert!(matches!(
            estimate_dimension_multi(&tree, &[1e-2, 1e-300]),
            Err(FractalError::InvalidParameter(_))
        ));

        let counter = CoveringCounter::new(1e-300).unwrap();
        assert_eq!(counter.contribution(tree.root()), None);
    }

    #[test]
    fn test_overflowed_counter_is_flagged() {
        let tree = classic_tree(3);
        let mut counter = CoveringCounter::new(1e-19).unwrap();
        tree.traverse(&mut counter);
        assert!(counter.is_overflowed());
        assert!(counter.into_sample().is_err());
    }

    #[test]
    fn test_unit_epsilon_is_degenerate() {
        let counter = CoveringCounter::new(1.0).unwrap();
        assert!(matches!(
            counter.into_sample(),
            Err(FractalError::DegenerateEstimate { epsilon, .. }) if epsilon == 1.0
        ));
    }

    #[test]
    fn test_count_of_one_gives_zero_dimension() {
        let tree = classic_tree(2);
        let sample = sample_dimension(&tree, 0.5).unwrap();
        assert_eq!(sample.count, 1);
        assert_eq!(sample.dimension, 0.0);
    }

    #[test]
    fn test_multi_is_mean_of_singles() {
        let tree = classic_tree(6);
        let d1 = estimate_dimension(&tree, 1e-2).unwrap();
        let d2 = estimate_dimension(&tree, 3e-3).unwrap();
        let report = estimate_dimension_multi(&tree, &[1e-2, 3e-3]).unwrap();
        assert!((report.mean - (d1 + d2) / 2.0).abs() < 1e-12);
        assert_eq!(report.samples.len(), 2);
        assert_eq!(report.samples[0].epsilon, 1e-2);
        assert_eq!(report.samples[1].epsilon, 3e-3);
    }

    #[test]
    fn test_multi_empty_fails() {
        let tree = classic_tree(3);
        assert!(matches!(
            estimate_dimension_multi(&tree, &[]),
            Err(FractalError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_multi_propagates_degenerate_radius() {
        let tree = classic_tree(6);
        assert!(matches!(
            estimate_dimension_multi(&tree, &[1e-2, 0.5]),
            Err(FractalError::DegenerateEstimate { .. })
        ));
    }
}
