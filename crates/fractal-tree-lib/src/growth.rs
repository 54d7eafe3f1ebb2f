//! Generation-by-generation expansion of a [`FractalTree`]
//!
//! Every call expands one full level: the current leaves are snapshotted
//! first, so children created during a generation only expand on the next.

use crate::{FractalError, FractalTree, GrowthRule, Result, Segment, Side};

/// Deepest tree that can be grown: `2^24 - 1` segments, about 16.7 million
pub const MAX_DEPTH: u32 = 24;

/// Build the `(left, right)` children of `parent` under `rule`
///
/// Both children start at the parent's midpoint, are `scale_factor` times
/// as long, and carry the flipped orientation.
pub fn child_segments(parent: &Segment, rule: &GrowthRule) -> (Segment, Segment) {
    let start = parent.midpoint();
    let length = rule.scale_factor * parent.length();
    let orientation = parent.orientation().flipped();

    let left = Segment::new(
        start,
        length,
        rule.left_angle_deg,
        Side::Left,
        orientation,
        true,
    );
    let right = Segment::new(
        start,
        length,
        rule.right_angle_deg,
        Side::Right,
        orientation,
        true,
    );
    (left, right)
}

/// Validate a target depth against `1..=MAX_DEPTH`
pub(crate) fn check_depth(depth: u32) -> Result<()> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(FractalError::InvalidParameter(format!(
            "depth must be between 1 and {MAX_DEPTH}, got {depth}"
        )));
    }
    Ok(())
}

/// Validate a growth rule before it is applied
pub(crate) fn check_rule(rule: &GrowthRule) -> Result<()> {
    if !rule.scale_factor.is_finite() || rule.scale_factor <= 0.0 {
        return Err(FractalError::InvalidParameter(format!(
            "scale factor must be positive and finite, got {}",
            rule.scale_factor
        )));
    }
    if !rule.left_angle_deg.is_finite() || !rule.right_angle_deg.is_finite() {
        return Err(FractalError::InvalidParameter(format!(
            "branch angles must be finite, got left={} right={}",
            rule.left_angle_deg, rule.right_angle_deg
        )));
    }
    Ok(())
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FractalTree {
    /// Expand every current leaf once using the tree's default rule
    ///
    /// Returns the number of leaves that were expanded.
    pub fn grow_one_generation(&mut self) -> Result<usize> {
        let rule = self.rule();
        self.grow_one_generation_with(rule)
    }

    /// Expand every current leaf once using `rule` for this generation only
    pub fn grow_one_generation_with(&mut self, rule: GrowthRule) -> Result<usize> {
        #[cfg(feature = "profiling")]
        profiling::scope!("growth::grow_one_generation");

        check_rule(&rule)?;

        let snapshot = self.leaves();
        for &leaf_id in &snapshot {
            let leaf = self.get(leaf_id).ok_or_else(|| {
                FractalError::InvalidParameter(format!("leaf {leaf_id} is not in this tree"))
            })?;
            let (left, right) = child_segments(leaf, &rule);
            self.attach_children(leaf_id, left, right)?;
        }

        self.set_depth(self.depth() + 1);
        tracing::debug!(
            depth = self.depth(),
            expanded = snapshot.len(),
            segments = self.segment_count(),
            "grew one generation"
        );

        Ok(snapshot.len())
    }

    /// Grow until the tree has `depth` levels
    ///
    /// On a fresh tree this runs exactly `depth - 1` generations, leaving
    /// `2^(depth-1)` leaves. Asking for a depth that is already reached does
    /// nothing. Fails with [`FractalError::InvalidParameter`] if `depth` is
    /// outside `1..=MAX_DEPTH`.
    pub fn grow_to_depth(&mut self, depth: u32) -> Result<()> {
        check_depth(depth)?;

        while self.depth() < depth {
            self.grow_one_generation()?;
        }
        Ok(())
    }
}
