//! Segment primitive: one oriented line of the fractal tree

use crate::utils;
use geo::{Coord, Line};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable index of a segment inside a [`FractalTree`](crate::FractalTree) arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    /// Position of the segment in the arena (root is always 0)
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child of its parent a segment is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Counter-clockwise child
    Left,
    /// Clockwise child
    Right,
}

/// Orientation flag; alternates at every generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// The orientation used by this segment's children
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

/// A single line segment with a derived end point
///
/// Invariant: `end == start + length * (cos(angle), sin(angle))`.
/// Everything but the leaf flag is fixed at construction; the flag itself
/// is only ever cleared by the owning tree when children are attached.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// Start point
    start: Coord<f64>,
    /// End point, derived from start, length and angle
    end: Coord<f64>,
    /// Length (positive)
    length: f64,
    /// Standard-frame angle in radians
    angle: f64,
    /// Orientation flag
    orientation: Orientation,
    /// Whether the segment has no children yet
    is_leaf: bool,
}

impl Segment {
    /// Create a segment from a construction-frame angle
    ///
    /// # Arguments
    /// * `start` - Start point
    /// * `length` - Segment length
    /// * `angle_deg` - Angle in degrees, construction frame
    /// * `side` - Left or right child of its parent (the root is built as `Right`)
    /// * `orientation` - Orientation flag of this segment
    /// * `is_leaf` - Initial leaf flag
    pub fn new(
        start: Coord<f64>,
        length: f64,
        angle_deg: f64,
        side: Side,
        orientation: Orientation,
        is_leaf: bool,
    ) -> Self {
        let angle = utils::construction_to_standard_deg(angle_deg, side, orientation).to_radians();
        Self {
            start,
            end: utils::polar_offset(start, length, angle),
            length,
            angle,
            orientation,
            is_leaf,
        }
    }

    /// Start point
    #[inline]
    pub fn start(&self) -> Coord<f64> {
        self.start
    }

    /// End point
    #[inline]
    pub fn end(&self) -> Coord<f64> {
        self.end
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Standard-frame angle in radians
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Arithmetic mean of start and end
    #[inline]
    pub fn midpoint(&self) -> Coord<f64> {
        utils::midpoint(self.start, self.end)
    }

    /// Set the leaf flag (nothing else changes)
    #[inline]
    pub fn set_leaf(&mut self, is_leaf: bool) {
        self.is_leaf = is_leaf;
    }

    /// Point the segment along a new standard-frame angle in degrees
    ///
    /// The start point and the length are preserved.
    pub fn rotate(&mut self, angle_deg: f64) {
        self.rotate_radians(angle_deg.to_radians());
    }

    /// Same as [`Segment::rotate`] with the angle given in radians
    pub fn rotate_radians(&mut self, angle_rad: f64) {
        self.angle = angle_rad;
        self.end = utils::polar_offset(self.start, self.length, angle_rad);
    }

    /// View as a `geo` line
    #[inline]
    pub fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    /// Coordinates split per axis, the layout plotting backends expect
    ///
    /// Returns `([x_start, x_end], [y_start, y_end])`.
    #[inline]
    pub fn plot_coords(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.start.x, self.end.x],
            [self.start.y, self.end.y],
        )
    }
}
