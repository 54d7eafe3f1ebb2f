//! Geometric parameter set and the tree construction entry point
//!
//! A [`TreeParams`] value is all it takes to regenerate an identical tree,
//! which makes it the natural thing to persist or pass around.

use crate::growth::{check_depth, check_rule};
use crate::{FractalError, FractalTree, GrowthRule, Orientation, Result, Segment, Side, utils};
use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of a fractal tree
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeParams {
    /// Start point of the root segment
    pub root_start: Coord<f64>,
    /// Length of the root segment
    pub root_length: f64,
    /// Root angle in degrees, construction frame (90 points straight up)
    pub root_angle_deg: f64,
    /// Angle for left children, construction frame, degrees
    pub left_angle_deg: f64,
    /// Angle for right children, construction frame, degrees
    pub right_angle_deg: f64,
    /// Child length relative to the parent
    pub scale_factor: f64,
    /// Number of levels, the root level included
    pub depth: u32,
}

impl Default for TreeParams {
    /// The classic configuration: a unit trunk centred on a 10x10 plot,
    /// right-angle branches shrinking by 0.6, ten levels deep.
    fn default() -> Self {
        Self {
            root_start: Coord { x: 5.0, y: 0.0 },
            root_length: 1.0,
            root_angle_deg: 90.0,
            left_angle_deg: 90.0,
            right_angle_deg: 90.0,
            scale_factor: 0.6,
            depth: 10,
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TreeParams {
    /// Growth rule derived from the branch angles and scale factor
    #[inline]
    pub fn growth_rule(&self) -> GrowthRule {
        GrowthRule {
            left_angle_deg: self.left_angle_deg,
            right_angle_deg: self.right_angle_deg,
            scale_factor: self.scale_factor,
        }
    }

    /// Check every parameter
    ///
    /// Fails with [`FractalError::InvalidParameter`] for a depth outside
    /// 1 to [`MAX_DEPTH`](crate::MAX_DEPTH), a non-positive root length or
    /// scale factor, or any non-finite value.
    pub fn validate(&self) -> Result<()> {
        check_depth(self.depth)?;
        if !self.root_length.is_finite() || self.root_length <= 0.0 {
            return Err(FractalError::InvalidParameter(format!(
                "root length must be positive and finite, got {}",
                self.root_length
            )));
        }
        if !utils::is_finite_coord(&self.root_start) {
            return Err(FractalError::InvalidParameter(format!(
                "root start must be finite, got ({}, {})",
                self.root_start.x, self.root_start.y
            )));
        }
        if !self.root_angle_deg.is_finite() {
            return Err(FractalError::InvalidParameter(format!(
                "root angle must be finite, got {}",
                self.root_angle_deg
            )));
        }
        check_rule(&self.growth_rule())
    }

    /// Build the tree described by these parameters
    pub fn build(&self) -> Result<FractalTree> {
        #[cfg(feature = "profiling")]
        profiling::scope!("params::build");

        self.validate()?;

        let root = Segment::new(
            self.root_start,
            self.root_length,
            self.root_angle_deg,
            Side::Right,
            Orientation::Vertical,
            true,
        );
        let mut tree = FractalTree::new(root, self.growth_rule());
        tree.grow_to_depth(self.depth)?;

        tracing::info!(
            depth = self.depth,
            segments = tree.segment_count(),
            leaves = tree.leaf_count(),
            "built fractal tree"
        );
        Ok(tree)
    }
}

/// Build a tree from its parameters; shorthand for [`TreeParams::build`]
#[inline]
pub fn build_tree(params: &TreeParams) -> Result<FractalTree> {
    params.build()
}
