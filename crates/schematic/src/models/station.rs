//! Stations and their per-axis track ledgers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::geometry::{Rotation, Vector, EPSILON};
use crate::identifiers::{LineIdentifier, StationIdentifier};
use crate::models::traits::StationRenderer;
use crate::models::types::{Axis, TrackBoundaries, TrackSlot};
use crate::models::preferred_track::PreferredTrack;

/// Shared handle to a station.
///
/// Track ledgers are mutated by every line routed through the station, so
/// stations are handed out behind a lock. Routing is strictly sequential
/// (one line at a time); the lock makes that discipline explicit rather
/// than enabling parallel routing.
pub type SharedStation = Arc<Mutex<Station>>;

/// Lock a shared station, ignoring poisoning (the ledger stays usable
/// even if a rendering callback panicked).
pub(crate) fn locked(station: &SharedStation) -> MutexGuard<'_, Station> {
    station.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A station: a base coordinate, a local compass orientation and the
/// ledger of track assignments lines hold here.
pub struct Station {
    id: StationIdentifier,
    base_coords: Vector,
    rotation: Rotation,
    tracks_x: Vec<TrackSlot>,
    tracks_y: Vec<TrackSlot>,

    /// Most recently vacated slot. A same-named line re-created right
    /// after an erase reuses it, keeping visual continuity across edits.
    phantom: Option<TrackSlot>,

    renderer: Option<Box<dyn StationRenderer>>,
}

impl Station {
    pub fn new(id: StationIdentifier, base_coords: Vector, rotation: Rotation) -> Self {
        Self {
            id,
            base_coords,
            rotation,
            tracks_x: Vec::new(),
            tracks_y: Vec::new(),
            phantom: None,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn StationRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn shared(self) -> SharedStation {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> &StationIdentifier {
        &self.id
    }

    pub fn base_coords(&self) -> Vector {
        self.base_coords
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn slots(&self, axis: Axis) -> &[TrackSlot] {
        match axis {
            Axis::X => &self.tracks_x,
            Axis::Y => &self.tracks_y,
        }
    }

    /// Record a line on a track. Clears the phantom slot.
    pub fn add_line(&mut self, line: &LineIdentifier, axis: Axis, track: i32) {
        self.phantom = None;
        let slot = TrackSlot {
            line: line.clone(),
            axis,
            track,
        };
        match axis {
            Axis::X => self.tracks_x.push(slot),
            Axis::Y => self.tracks_y.push(slot),
        }
    }

    /// Remove a line from both axes, stashing the last removed slot as
    /// the phantom.
    pub fn remove_line(&mut self, line: &LineIdentifier) {
        for slots in [&mut self.tracks_x, &mut self.tracks_y] {
            let mut i = 0;
            while i < slots.len() {
                if &slots[i].line == line {
                    self.phantom = Some(slots.remove(i));
                } else {
                    i += 1;
                }
            }
        }
    }

    /// The assignment a line already holds here, x axis first.
    pub fn slot_for_line(&self, line: &LineIdentifier) -> Option<&TrackSlot> {
        self.tracks_x
            .iter()
            .chain(self.tracks_y.iter())
            .find(|slot| &slot.line == line)
    }

    /// Pick a track for a line on the given axis.
    ///
    /// Explicit numbers are trusted verbatim, with no collision check:
    /// an operator override trumps automatic layout even when it lands on
    /// an occupied track. Otherwise a matching phantom is reused, and
    /// failing that the next free slot beyond the occupied boundary on
    /// the preferred side.
    pub fn assign_track(&self, axis: Axis, preferred: &PreferredTrack, line: &LineIdentifier) -> i32 {
        if let Some(number) = preferred.number() {
            return number;
        }
        if let Some(phantom) = &self.phantom {
            if &phantom.line == line && phantom.axis == axis {
                return phantom.track;
            }
        }
        let (min, max) = self.boundaries_for_axis(axis);
        if preferred.is_positive() {
            max + 1
        } else {
            min - 1
        }
    }

    fn boundaries_for_axis(&self, axis: Axis) -> (i32, i32) {
        let slots = self.slots(axis);
        if slots.is_empty() {
            return (1, -1);
        }
        slots
            .iter()
            .fold((0, 0), |(min, max), slot| (min.min(slot.track), max.max(slot.track)))
    }

    /// Occupied-track boundaries for both axes.
    pub fn position_boundaries(&self) -> TrackBoundaries {
        TrackBoundaries {
            x: self.boundaries_for_axis(Axis::X),
            y: self.boundaries_for_axis(Axis::Y),
        }
    }

    /// Coordinate of a track in the global frame.
    ///
    /// The offset runs perpendicular to the incoming direction (x for
    /// vertical entries, y for horizontal ones), laid out in the
    /// station's local frame and rotated into place.
    pub fn rotated_track_coordinates(
        &self,
        incoming: Rotation,
        track: i32,
        config: &Config,
    ) -> Vector {
        let offset = f64::from(track) * config.line_distance;
        let local = if incoming.is_vertical() {
            Vector::new(offset, 0.0)
        } else {
            Vector::new(0.0, offset)
        };
        self.base_coords.add(local.rotate(self.rotation))
    }

    /// Physical half-extent of the station along one side of an axis.
    ///
    /// `direction`'s sign picks the side; the furthest occupied track on
    /// that side contributes, plus the fixed station/label clearance.
    pub fn station_size_for_axis(&self, axis: Axis, direction: f64, config: &Config) -> f64 {
        if direction.abs() < EPSILON {
            return 0.0;
        }
        let sign = direction.signum();
        let (min, max) = self.boundaries_for_axis(axis);
        let mut dimen = f64::from(if direction < 0.0 { min } else { max });
        if sign * dimen < 0.0 {
            dimen = 0.0;
        }
        dimen * config.line_distance + sign * (config.default_station_dimen + config.label_distance)
    }

    pub fn lines_existing(&self) -> bool {
        !self.tracks_x.is_empty() || !self.tracks_y.is_empty()
    }

    /// Redraw the station glyph with its current boundaries.
    pub fn draw(&mut self, delay_seconds: f64) {
        let boundaries = self.position_boundaries();
        if let Some(renderer) = &mut self.renderer {
            renderer.draw(delay_seconds, boundaries);
        }
    }

    pub fn move_to(&mut self, delay_seconds: f64, duration_seconds: f64, to: Vector) {
        let from = self.base_coords;
        if let Some(renderer) = &mut self.renderer {
            renderer.move_to(delay_seconds, duration_seconds, from, to);
        }
    }

    pub fn erase(&mut self, delay_seconds: f64) {
        if let Some(renderer) = &mut self.renderer {
            renderer.erase(delay_seconds);
        }
    }
}

impl std::fmt::Debug for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Station")
            .field("id", &self.id)
            .field("base_coords", &self.base_coords)
            .field("rotation", &self.rotation)
            .field("tracks_x", &self.tracks_x)
            .field("tracks_y", &self.tracks_y)
            .field("phantom", &self.phantom)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn station() -> Station {
        Station::new(StationIdentifier::new("a"), Vector::NULL, Rotation::NORTH)
    }

    fn line(name: &str) -> LineIdentifier {
        LineIdentifier::new(name)
    }

    fn auto(hint: &str) -> PreferredTrack {
        PreferredTrack::positive().updated(hint)
    }

    #[test]
    fn test_slot_for_line_prefers_x_axis() {
        let mut s = station();
        let l = line("s1");

        assert!(s.slot_for_line(&l).is_none());

        s.add_line(&l, Axis::Y, 4);
        let slot = s.slot_for_line(&l).unwrap();
        assert_eq!(slot.axis, Axis::Y);
        assert_eq!(slot.track, 4);

        s.add_line(&l, Axis::X, 0);
        let slot = s.slot_for_line(&l).unwrap();
        assert_eq!(slot.axis, Axis::X);
        assert_eq!(slot.track, 0);

        s.remove_line(&l);
        assert!(s.slot_for_line(&l).is_none());
    }

    #[test]
    fn test_assign_track_empty_station() {
        let s = station();
        let l = line("s1");

        assert_eq!(s.assign_track(Axis::X, &auto("+"), &l), 0);
        assert_eq!(s.assign_track(Axis::X, &auto("+1"), &l), 1);
        assert_eq!(s.assign_track(Axis::X, &auto("-2"), &l), -2);
        assert_eq!(s.assign_track(Axis::X, &auto("-"), &l), 0);
    }

    #[test]
    fn test_assign_track_single_line() {
        let mut s = station();
        let l = line("s1");

        s.add_line(&l, Axis::X, -1);
        assert_eq!(s.assign_track(Axis::X, &auto("+"), &l), 1);
        assert_eq!(s.assign_track(Axis::X, &auto("+1"), &l), 1);
        assert_eq!(s.assign_track(Axis::X, &auto("-1"), &l), -1);
        assert_eq!(s.assign_track(Axis::X, &auto("-2"), &l), -2);
        assert_eq!(s.assign_track(Axis::X, &auto("-"), &l), -2);
    }

    #[test]
    fn test_assign_track_single_line_on_zero() {
        let mut s = station();
        let l = line("s1");

        s.add_line(&l, Axis::X, 0);
        assert_eq!(s.assign_track(Axis::X, &auto("+"), &l), 1);
        assert_eq!(s.assign_track(Axis::X, &auto("+0"), &l), 0);
        assert_eq!(s.assign_track(Axis::X, &auto("-2"), &l), -2);
        assert_eq!(s.assign_track(Axis::X, &auto("-"), &l), -1);
    }

    #[test]
    fn test_assign_track_multiple_lines() {
        let mut s = station();
        let l = line("s1");

        s.add_line(&l, Axis::X, 1);
        s.add_line(&l, Axis::Y, -1);
        s.add_line(&l, Axis::Y, 0);
        s.add_line(&l, Axis::Y, 3);
        assert_eq!(s.assign_track(Axis::Y, &auto("+"), &l), 4);
        assert_eq!(s.assign_track(Axis::Y, &auto("+1"), &l), 1);
        assert_eq!(s.assign_track(Axis::Y, &auto("-2"), &l), -2);
        assert_eq!(s.assign_track(Axis::Y, &auto("-"), &l), -2);
    }

    #[test]
    fn test_auto_assignment_is_monotonic() {
        let mut s = station();
        let mut ups = Vec::new();
        let mut downs = Vec::new();
        for i in 0..3 {
            let up = line(&format!("up{i}"));
            let track = s.assign_track(Axis::Y, &auto("+"), &up);
            s.add_line(&up, Axis::Y, track);
            ups.push(track);

            let down = line(&format!("down{i}"));
            let track = s.assign_track(Axis::Y, &auto("-"), &down);
            s.add_line(&down, Axis::Y, track);
            downs.push(track);
        }
        assert_eq!(ups, vec![0, 1, 2]);
        assert_eq!(downs, vec![-1, -2, -3]);
    }

    #[test]
    fn test_phantom_track_reused_by_same_name_only() {
        let mut s = station();
        let erased = line("s1");
        let other = line("s2");

        s.add_line(&erased, Axis::X, 1);
        s.add_line(&other, Axis::X, 2);
        s.remove_line(&erased);

        // The erased line gets its old slot back; anyone else allocates
        // beyond the remaining boundary.
        assert_eq!(s.assign_track(Axis::X, &auto("+"), &other), 3);
        assert_eq!(s.assign_track(Axis::X, &auto("+"), &erased), 1);
        assert_eq!(s.assign_track(Axis::X, &auto("-1"), &erased), -1);
    }

    #[test]
    fn test_phantom_does_not_apply_across_axes() {
        let mut s = station();
        let l = line("s1");

        s.add_line(&l, Axis::X, 2);
        s.remove_line(&l);
        assert_eq!(s.assign_track(Axis::Y, &auto("+"), &l), 0);
        assert_eq!(s.assign_track(Axis::X, &auto("+"), &l), 2);
    }

    #[test]
    fn test_explicit_track_may_collide() {
        // Operator overrides are trusted even onto occupied tracks.
        let mut s = station();
        s.add_line(&line("s1"), Axis::X, 1);
        assert_eq!(s.assign_track(Axis::X, &auto("+1"), &line("s2")), 1);
    }

    #[test]
    fn test_rotated_track_coordinates_north_station() {
        let config = Config::default();
        let s = Station::new(
            StationIdentifier::new("a"),
            Vector::new(50.0, 60.0),
            Rotation::NORTH,
        );

        let v = s.rotated_track_coordinates(Rotation::new(0.0), 3, &config);
        assert_abs_diff_eq!(v.x(), 50.0 + 3.0 * config.line_distance, epsilon = 1e-9);
        assert_abs_diff_eq!(v.y(), 60.0, epsilon = 1e-9);

        let v = s.rotated_track_coordinates(Rotation::new(90.0), 0, &config);
        assert_eq!(v, Vector::new(50.0, 60.0));

        let v = s.rotated_track_coordinates(Rotation::new(90.0), -1, &config);
        assert_abs_diff_eq!(v.x(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.y(), 60.0 - config.line_distance, epsilon = 1e-9);
    }

    #[test]
    fn test_rotated_track_coordinates_rotated_stations() {
        let config = Config::default();
        let base = Vector::new(50.0, 60.0);
        let s = Station::new(StationIdentifier::new("a"), base, Rotation::NORTH_WEST);

        // Vertical entry, negative track: local -x, swung 45deg ccw.
        let v = s.rotated_track_coordinates(Rotation::new(0.0), -5, &config);
        assert_abs_diff_eq!(base.delta(v).length(), 5.0 * config.line_distance, epsilon = 1e-9);
        assert!(v.x() < base.x());
        assert!(v.y() > base.y());

        // Horizontal entry, positive track: local +y.
        let v = s.rotated_track_coordinates(Rotation::new(-90.0), 3, &config);
        assert_abs_diff_eq!(base.delta(v).length(), 3.0 * config.line_distance, epsilon = 1e-9);
        assert!(v.x() > base.x());
        assert!(v.y() > base.y());

        let v = s.rotated_track_coordinates(Rotation::new(180.0), 2, &config);
        assert!(v.x() > base.x());
        assert!(v.y() < base.y());

        let v = s.rotated_track_coordinates(Rotation::new(-90.0), 0, &config);
        assert_eq!(v, base);

        let s = Station::new(StationIdentifier::new("b"), Vector::NULL, Rotation::WEST);
        let v = s.rotated_track_coordinates(Rotation::new(0.0), -5, &config);
        assert_abs_diff_eq!(v.x(), 0.0, epsilon = 1e-9);
        assert!(v.y() > 0.0);
    }

    #[test]
    fn test_station_size_no_lines() {
        let config = Config::default();
        let s = station();
        let clearance = config.default_station_dimen + config.label_distance;

        assert_eq!(s.station_size_for_axis(Axis::X, 1.0, &config), clearance);
        assert_eq!(s.station_size_for_axis(Axis::X, -1.0, &config), -clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, 1.0, &config), clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, -1.0, &config), -clearance);
    }

    #[test]
    fn test_station_size_lines_on_x_axis() {
        let config = Config::default();
        let mut s = station();
        let l = line("s1");
        let clearance = config.default_station_dimen + config.label_distance;

        s.add_line(&l, Axis::X, -1);
        s.add_line(&l, Axis::X, 4);
        assert_eq!(
            s.station_size_for_axis(Axis::X, 1.0, &config),
            4.0 * config.line_distance + clearance
        );
        assert_eq!(
            s.station_size_for_axis(Axis::X, -1.0, &config),
            -(config.line_distance + clearance)
        );
        assert_eq!(s.station_size_for_axis(Axis::X, 0.00001, &config), 0.0);
        assert_eq!(s.station_size_for_axis(Axis::Y, 1.0, &config), clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, -1.0, &config), -clearance);
    }

    #[test]
    fn test_station_size_single_line_on_zero() {
        let config = Config::default();
        let mut s = station();
        let clearance = config.default_station_dimen + config.label_distance;

        s.add_line(&line("s1"), Axis::Y, 0);
        assert_eq!(s.station_size_for_axis(Axis::Y, 5.0, &config), clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, -1.0, &config), -clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, 0.0, &config), 0.0);
    }

    #[test]
    fn test_station_size_lines_in_all_quadrants() {
        let config = Config::default();
        let mut s = station();
        let l = line("s1");
        let l2 = line("s2");
        let clearance = config.default_station_dimen + config.label_distance;

        s.add_line(&l, Axis::X, -1);
        s.add_line(&l, Axis::X, 4);
        s.add_line(&l, Axis::Y, 0);
        s.add_line(&l2, Axis::Y, -2);
        assert_eq!(s.station_size_for_axis(Axis::Y, 5.0, &config), clearance);
        assert_eq!(
            s.station_size_for_axis(Axis::Y, -1.0, &config),
            -(2.0 * config.line_distance + clearance)
        );

        s.remove_line(&l);
        assert_eq!(s.station_size_for_axis(Axis::X, 1.0, &config), clearance);
        assert_eq!(s.station_size_for_axis(Axis::X, -1.0, &config), -clearance);
        assert_eq!(s.station_size_for_axis(Axis::Y, 5.0, &config), clearance);
        assert_eq!(
            s.station_size_for_axis(Axis::Y, -1.0, &config),
            -(2.0 * config.line_distance + clearance)
        );
    }

    #[test]
    fn test_lines_existing() {
        let mut s = station();
        assert!(!s.lines_existing());
        s.add_line(&line("s1"), Axis::Y, 0);
        assert!(s.lines_existing());
    }

    #[test]
    fn test_renderer_delegation() {
        #[derive(Debug, Default)]
        struct Log {
            draws: Vec<(f64, TrackBoundaries)>,
            moves: Vec<(Vector, Vector)>,
            erased: bool,
        }

        #[derive(Clone, Default)]
        struct Recorder(Arc<Mutex<Log>>);

        impl StationRenderer for Recorder {
            fn draw(&mut self, delay_seconds: f64, boundaries: TrackBoundaries) {
                self.0.lock().unwrap().draws.push((delay_seconds, boundaries));
            }

            fn move_to(&mut self, _delay: f64, _duration: f64, from: Vector, to: Vector) {
                self.0.lock().unwrap().moves.push((from, to));
            }

            fn erase(&mut self, _delay: f64) {
                self.0.lock().unwrap().erased = true;
            }
        }

        let recorder = Recorder::default();
        let log = recorder.0.clone();
        let mut s = Station::new(
            StationIdentifier::new("a"),
            Vector::new(5.0, 5.0),
            Rotation::NORTH,
        )
        .with_renderer(Box::new(recorder));

        s.add_line(&line("s1"), Axis::X, 2);
        s.draw(1.5);
        s.move_to(0.0, 1.0, Vector::new(9.0, 5.0));
        s.erase(0.0);

        let log = log.lock().unwrap();
        assert_eq!(
            log.draws,
            vec![(1.5, TrackBoundaries { x: (0, 2), y: (1, -1) })]
        );
        assert_eq!(log.moves, vec![(Vector::new(5.0, 5.0), Vector::new(9.0, 5.0))]);
        assert!(log.erased);
    }
}
