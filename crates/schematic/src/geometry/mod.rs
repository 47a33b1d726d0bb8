//! Geometry primitives for schematic diagrams.
//!
//! Coordinates live in screen space (x grows right, y grows down).
//! Directions are compass angles measured clockwise from north, kept in
//! the range `(-180, 180]` degrees.

mod rotation;
mod vector;

pub use rotation::Rotation;
pub use vector::Vector;

/// Tolerance for "is this effectively zero" checks on lengths and offsets.
pub(crate) const EPSILON: f64 = 1e-4;
