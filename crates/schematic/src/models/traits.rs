//! Collaborator interfaces of the routing core.
//!
//! The core computes geometry and hands it to these traits; how stations
//! are stored and how anything is drawn or animated is a backend concern.

use crate::geometry::{Rotation, Vector};
use crate::identifiers::{LineIdentifier, StationIdentifier};
use crate::models::line_group::SharedLineGroup;
use crate::models::station::SharedStation;
use crate::models::types::TrackBoundaries;

/// Resolves station ids and creates helper stations on demand.
pub trait StationProvider {
    fn station_by_id(&self, id: &StationIdentifier) -> Option<SharedStation>;

    /// Create a station that exists only as a routing waypoint.
    ///
    /// Callers resolve `id` via [`StationProvider::station_by_id`] first;
    /// this is only invoked for ids that do not exist yet.
    fn create_virtual_stop(
        &mut self,
        id: StationIdentifier,
        base_coords: Vector,
        rotation: Rotation,
    ) -> SharedStation;

    /// Rendering-side group shared by all lines of one name. The routing
    /// logic only threads its stroke-color deviation value through.
    fn line_group_by_id(&mut self, name: &LineIdentifier) -> SharedLineGroup;
}

/// Draws and animates a routed line. All timings are in seconds.
pub trait LineRenderer: Send {
    fn draw(
        &mut self,
        delay_seconds: f64,
        duration_seconds: f64,
        reverse: bool,
        path: &[Vector],
        length: f64,
        color_deviation: f64,
    );

    /// Morph the line from one path to another of the same node count.
    fn move_path(
        &mut self,
        delay_seconds: f64,
        duration_seconds: f64,
        from: &[Vector],
        to: &[Vector],
        color_from: f64,
        color_to: f64,
    );

    fn erase(&mut self, delay_seconds: f64, duration_seconds: f64, reverse: bool, length: f64);
}

/// Draws and animates a station glyph.
pub trait StationRenderer: Send {
    /// Redraw with the current occupied-track boundaries.
    fn draw(&mut self, delay_seconds: f64, boundaries: TrackBoundaries);

    fn move_to(&mut self, delay_seconds: f64, duration_seconds: f64, from: Vector, to: Vector);

    fn erase(&mut self, delay_seconds: f64);
}
