//! Immutable 2D points and displacement vectors.

use glam::{DMat2, DVec2};

use super::{Rotation, EPSILON};

/// A point or displacement in diagram (screen) space.
///
/// Value semantics only; all operations return new vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector(DVec2);

impl Vector {
    /// The origin.
    pub const NULL: Vector = Vector(DVec2::ZERO);

    /// Unit vector pointing north (up on screen).
    pub const UNIT: Vector = Vector(DVec2::new(0.0, -1.0));

    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn add(self, that: Vector) -> Vector {
        Vector(self.0 + that.0)
    }

    /// Displacement from `self` to `that`.
    pub fn delta(self, that: Vector) -> Vector {
        Vector(that.0 - self.0)
    }

    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Same direction, given length. The null vector stays null.
    pub fn with_length(self, length: f64) -> Vector {
        Vector(self.0.normalize_or_zero() * length)
    }

    /// Linear interpolation between `self` and `that`.
    pub fn between(self, that: Vector, ratio: f64) -> Vector {
        Vector(self.0.lerp(that.0, ratio))
    }

    /// Compass bearing of this displacement.
    ///
    /// North is 0, east is 90; the null vector inclines to 0.
    pub fn inclination(&self) -> Rotation {
        Rotation::new(self.0.x.atan2(-self.0.y).to_degrees())
    }

    /// Rotate clockwise on screen by the given compass angle.
    pub fn rotate(self, rotation: Rotation) -> Vector {
        Vector(DMat2::from_angle(rotation.radians()) * self.0)
    }

    /// Whether this displacement already runs along both unit directions:
    /// forward along `dir_a` (the exit ray) and backward along `dir_b`
    /// (the entry ray). A null displacement trivially matches.
    pub fn is_delta_matching_parallel(&self, dir_a: Vector, dir_b: Vector) -> bool {
        let len = self.length();
        if len < EPSILON {
            return true;
        }
        let parallel_a = self.0.perp_dot(dir_a.0).abs() < EPSILON * len;
        let parallel_b = self.0.perp_dot(dir_b.0).abs() < EPSILON * len;
        parallel_a && parallel_b && self.0.dot(dir_a.0) > 0.0 && self.0.dot(dir_b.0) < 0.0
    }

    /// Solve `dir_a * a - dir_b * b = self` for the ray parameters
    /// `(a, b)`: the signed distances along each ray to their
    /// intersection. `None` when the directions are parallel.
    pub fn solve_delta_for_intersection(&self, dir_a: Vector, dir_b: Vector) -> Option<(f64, f64)> {
        let system = DMat2::from_cols(dir_a.0, DVec2::new(-dir_b.0.x, -dir_b.0.y));
        if system.determinant().abs() < 1e-9 {
            return None;
        }
        let solution = system.inverse() * self.0;
        Some((solution.x, solution.y))
    }
}
