//! Utility functions for angle conversions and small coordinate helpers

use crate::segment::{Orientation, Side};
use geo::Coord;

/// Offset applied to right-hand children of horizontal parents (degrees)
const RIGHT_HORIZONTAL_OFFSET_DEG: f64 = 90.0;

/// Pivot used to mirror left-hand children of horizontal parents (degrees)
const LEFT_HORIZONTAL_PIVOT_DEG: f64 = 270.0;

/// Convert an angle from the construction frame to the standard frame
///
/// The construction frame measures angles relative to the parent's
/// orientation and mirrors them for left-hand children:
///
/// | side  | orientation | standard angle |
/// |-------|-------------|----------------|
/// | right | vertical    | `a`            |
/// | right | horizontal  | `a - 90`       |
/// | left  | vertical    | `-a`           |
/// | left  | horizontal  | `270 - a`      |
///
/// # Arguments
/// * `angle_deg` - Angle in degrees, construction frame
/// * `side` - Which child of the parent this angle belongs to
/// * `orientation` - Orientation flag of the segment being built
///
/// # Returns
/// The standard-frame angle in degrees (not wrapped into any range)
#[inline(always)]
pub fn construction_to_standard_deg(angle_deg: f64, side: Side, orientation: Orientation) -> f64 {
    match (side, orientation) {
        (Side::Right, Orientation::Vertical) => angle_deg,
        (Side::Right, Orientation::Horizontal) => angle_deg - RIGHT_HORIZONTAL_OFFSET_DEG,
        (Side::Left, Orientation::Vertical) => -angle_deg,
        (Side::Left, Orientation::Horizontal) => LEFT_HORIZONTAL_PIVOT_DEG - angle_deg,
    }
}

/// Point reached by walking `length` from `start` along `angle_rad`
#[inline(always)]
pub fn polar_offset(start: Coord<f64>, length: f64, angle_rad: f64) -> Coord<f64> {
    let (sin, cos) = angle_rad.sin_cos();
    Coord {
        x: start.x + length * cos,
        y: start.y + length * sin,
    }
}

/// Arithmetic mean of two coordinates
#[inline(always)]
pub fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    Coord {
        x: 0.5 * (a.x + b.x),
        y: 0.5 * (a.y + b.y),
    }
}

/// Check that every component of a coordinate is finite
#[inline(always)]
pub fn is_finite_coord(coord: &Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}
