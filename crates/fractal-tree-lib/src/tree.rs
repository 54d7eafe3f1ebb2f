//! Arena-backed binary tree of segments
//!
//! Segments live in a flat `Vec` addressed by [`SegmentId`]. A parallel
//! table maps every expanded segment to its `(left, right)` pair, so a
//! segment has exactly zero or two children and the root is always index 0.

use crate::{FractalError, Result, Segment, SegmentId};
use geo::{BoundingRect, LineString, MultiLineString, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Growth rule applied when a generation is added without explicit overrides
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrowthRule {
    /// Angle for left children, construction frame, degrees
    pub left_angle_deg: f64,
    /// Angle for right children, construction frame, degrees
    pub right_angle_deg: f64,
    /// Child length relative to the parent (expected in `(0, 1)`)
    pub scale_factor: f64,
}

impl Default for GrowthRule {
    fn default() -> Self {
        Self {
            left_angle_deg: 90.0,
            right_angle_deg: 90.0,
            scale_factor: 0.6,
        }
    }
}

/// Binary fractal tree owning all of its segments
#[derive(Clone, Debug)]
pub struct FractalTree {
    /// All segments, root first
    segments: Vec<Segment>,
    /// `children[i]` is `Some((left, right))` iff segment `i` is not a leaf
    children: Vec<Option<(SegmentId, SegmentId)>>,
    /// `parents[i]` is `None` only for the root
    parents: Vec<Option<SegmentId>>,
    /// Default rule for new generations
    rule: GrowthRule,
    /// Number of levels, root level included
    depth: u32,
}

/// Owned, pre-order description of one segment for external consumers
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentRecord {
    pub id: SegmentId,
    pub parent: Option<SegmentId>,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub is_leaf: bool,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FractalTree {
    /// Create a tree holding only `root`
    ///
    /// The root is always stored as a leaf, whatever flag it was built with.
    pub fn new(mut root: Segment, rule: GrowthRule) -> Self {
        root.set_leaf(true);
        Self {
            segments: vec![root],
            children: vec![None],
            parents: vec![None],
            rule,
            depth: 1,
        }
    }

    /// Identity of the root segment
    #[inline]
    pub fn root_id(&self) -> SegmentId {
        SegmentId(0)
    }

    /// The root segment
    #[inline]
    pub fn root(&self) -> &Segment {
        &self.segments[0]
    }

    /// Check whether `id` refers to the root
    #[inline]
    pub fn is_root(&self, id: SegmentId) -> bool {
        id == self.root_id()
    }

    /// Get a segment by id
    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Children of a segment, `None` for leaves and unknown ids
    #[inline]
    pub fn children(&self, id: SegmentId) -> Option<(SegmentId, SegmentId)> {
        self.children.get(id.0).copied().flatten()
    }

    /// Parent of a segment, `None` for the root and unknown ids
    #[inline]
    pub fn parent(&self, id: SegmentId) -> Option<SegmentId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Attach two children to a leaf segment
    ///
    /// Clears the parent's leaf flag and returns the new ids. Fails with
    /// [`FractalError::InvalidTreeOperation`] if the parent already has
    /// children.
    pub fn attach_children(
        &mut self,
        parent: SegmentId,
        mut left: Segment,
        mut right: Segment,
    ) -> Result<(SegmentId, SegmentId)> {
        let parent_segment = self.segments.get_mut(parent.0).ok_or_else(|| {
            FractalError::InvalidParameter(format!("unknown segment {parent}"))
        })?;

        if !parent_segment.is_leaf() {
            return Err(FractalError::InvalidTreeOperation { segment: parent });
        }
        parent_segment.set_leaf(false);

        left.set_leaf(true);
        right.set_leaf(true);
        let left_id = self.push(left, parent);
        let right_id = self.push(right, parent);
        self.children[parent.0] = Some((left_id, right_id));

        Ok((left_id, right_id))
    }

    fn push(&mut self, segment: Segment, parent: SegmentId) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(segment);
        self.children.push(None);
        self.parents.push(Some(parent));
        id
    }

    /// Ids of all current leaves, in arena order
    pub fn leaves(&self) -> Vec<SegmentId> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_leaf())
            .map(|(index, _)| SegmentId(index))
            .collect()
    }

    /// Total number of segments
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of leaf segments
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_leaf()).count()
    }

    /// Number of levels, the root level included (a fresh tree has depth 1)
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    /// Default growth rule
    #[inline]
    pub fn rule(&self) -> GrowthRule {
        self.rule
    }

    /// Replace the default growth rule used by later generations
    #[inline]
    pub fn set_rule(&mut self, rule: GrowthRule) {
        self.rule = rule;
    }

    /// Check if the tree has branched at least once
    #[inline]
    pub fn has_branches(&self) -> bool {
        self.segments.len() > 1
    }

    /// All segments as a `geo` multi-line-string, in arena order
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(
            self.segments
                .iter()
                .map(|segment| LineString::new(vec![segment.start(), segment.end()]))
                .collect(),
        )
    }

    /// Axis-aligned extent of the whole tree
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_multi_line_string().bounding_rect()
    }

    /// Owned records of every segment, in pre-order
    pub fn segment_records(&self) -> Vec<SegmentRecord> {
        self.segments()
            .map(|(id, segment)| SegmentRecord {
                id,
                parent: self.parent(id),
                start: [segment.start().x, segment.start().y],
                end: [segment.end().x, segment.end().y],
                is_leaf: segment.is_leaf(),
            })
            .collect()
    }
}
