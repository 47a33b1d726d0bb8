//! Core data types for diagram routing.

use crate::geometry::{Rotation, Vector};
use crate::identifiers::{LineIdentifier, StationIdentifier};

// ============================================================================
// Enums
// ============================================================================

/// Which station-local direction a track offset is measured along.
///
/// Tracks on the `X` axis separate lines running vertically through the
/// station; tracks on the `Y` axis separate lines running horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axis implied by a station-relative incoming direction.
    pub fn for_incoming(direction: Rotation) -> Axis {
        if direction.is_vertical() {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Direction the lines of this axis run in, station-relative.
    pub fn tangent(&self) -> Rotation {
        match self {
            Axis::X => Rotation::NORTH,
            Axis::Y => Rotation::EAST,
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// One entry in a line's itinerary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub station: StationIdentifier,

    /// Raw author-supplied track hint (`""`, `"+"`, `"-"`, `"+2"`, ...).
    pub track_hint: String,

    /// Resolved coordinate, set once the line has been routed.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub coord: Option<Vector>,
}

impl Stop {
    pub fn new(station: impl Into<StationIdentifier>, track_hint: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            track_hint: track_hint.into(),
            coord: None,
        }
    }
}

/// A track assignment held by a line at a station.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackSlot {
    pub line: LineIdentifier,
    pub axis: Axis,
    pub track: i32,
}

/// Occupied-track boundaries per axis, `(min, max)`.
///
/// An axis without any assignment reports the inverted marker `(1, -1)`;
/// an occupied axis always spans 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackBoundaries {
    pub x: (i32, i32),
    pub y: (i32, i32),
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("line {line}: station with id {station} is undefined")]
    UnknownStation {
        line: LineIdentifier,
        station: StationIdentifier,
    },
}

pub type Result<T> = std::result::Result<T, RoutingError>;
