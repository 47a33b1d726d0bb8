//! Compass angles and direction snapping.

use std::fmt;

/// A compass angle in degrees, clockwise from north.
///
/// Named directions map to multiples of 45 degrees (`n` = 0, `e` = 90,
/// `s` = 180, `w` = -90). Arithmetic keeps results in `(-180, 180]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    degrees: f64,
}

/// JavaScript-style rounding: halves round toward positive infinity.
///
/// Snapped directions depend on this for deterministic tie-breaking, e.g.
/// an inclination exactly between two candidates snaps to the larger one.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn normalized(mut degrees: f64) -> f64 {
    degrees %= 360.0;
    if degrees <= -180.0 {
        degrees += 360.0;
    }
    if degrees > 180.0 {
        degrees -= 360.0;
    }
    degrees
}

impl Rotation {
    pub const NORTH: Rotation = Rotation { degrees: 0.0 };
    pub const NORTH_EAST: Rotation = Rotation { degrees: 45.0 };
    pub const EAST: Rotation = Rotation { degrees: 90.0 };
    pub const SOUTH_EAST: Rotation = Rotation { degrees: 135.0 };
    pub const SOUTH: Rotation = Rotation { degrees: 180.0 };
    pub const SOUTH_WEST: Rotation = Rotation { degrees: -135.0 };
    pub const WEST: Rotation = Rotation { degrees: -90.0 };
    pub const NORTH_WEST: Rotation = Rotation { degrees: -45.0 };

    pub fn new(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Parse a compass direction name (`n`, `ne`, `e`, ...).
    pub fn from_compass(name: &str) -> Option<Self> {
        match name {
            "n" => Some(Self::NORTH),
            "ne" => Some(Self::NORTH_EAST),
            "e" => Some(Self::EAST),
            "se" => Some(Self::SOUTH_EAST),
            "s" => Some(Self::SOUTH),
            "sw" => Some(Self::SOUTH_WEST),
            "w" => Some(Self::WEST),
            "nw" => Some(Self::NORTH_WEST),
            _ => None,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Sum of two angles, wrapped into `(-180, 180]`.
    pub fn add(self, that: Rotation) -> Rotation {
        Rotation::new(normalized(self.degrees + that.degrees))
    }

    /// Half turn from this direction.
    pub fn reversed(self) -> Rotation {
        self.add(Rotation::new(180.0))
    }

    /// Signed shortest angular distance from `self` to `that`.
    ///
    /// The result is in `(-180, 180]`; two opposite directions always
    /// yield `+180`, never `-180`.
    pub fn delta(self, that: Rotation) -> Rotation {
        let mut a = self.degrees;
        let mut b = that.degrees;
        let mut dist = b - a;
        if dist.abs() > 180.0 {
            if a < 0.0 {
                a += 360.0;
            }
            if b < 0.0 {
                b += 360.0;
            }
            dist = b - a;
        }
        Rotation::new(normalized(dist))
    }

    /// Whether this direction runs along the north-south axis.
    pub fn is_vertical(&self) -> bool {
        (self.degrees % 180.0).abs() < 1e-9
    }

    /// Snap to the nearest of the four directions orthogonal to `basis`.
    ///
    /// Returns the direction *relative to* `basis`, i.e. one of
    /// `{-90, 0, 90, 180}`.
    pub fn quarter_direction(self, basis: Rotation) -> Rotation {
        let relative = normalized(self.degrees - basis.degrees);
        Rotation::new(normalized(round_half_up(relative / 90.0) * 90.0))
    }

    /// Snap to the nearer of the two directions along `tangent`,
    /// relative to `basis`.
    ///
    /// `tangent` names the candidate pair: 0 snaps onto `{0, 180}`,
    /// 90 onto `{-90, 90}`.
    pub fn half_direction(self, basis: Rotation, tangent: Rotation) -> Rotation {
        let relative = normalized(self.degrees - basis.degrees);
        let offset = tangent.degrees;
        Rotation::new(normalized(
            round_half_up((relative - offset) / 180.0) * 180.0 + offset,
        ))
    }

    /// Rotate one 45-degree step toward the side given by `offset`.
    ///
    /// The step is only taken when the offset stays within the current
    /// 45-degree sector (`|offset| < 45`); otherwise the angle is kept.
    /// Used to orient helper stations between two real stations.
    pub fn nudged(self, offset: Rotation) -> Rotation {
        let degrees = offset.degrees();
        if degrees == 0.0 || degrees.abs() >= 45.0 {
            return self;
        }
        self.add(Rotation::new(45.0 * degrees.signum()))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{b0}", self.degrees)
    }
}
