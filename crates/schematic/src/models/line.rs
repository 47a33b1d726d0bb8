//! Lines and the orthogonal routing algorithm.
//!
//! A line walks its stop sequence station by station. Every station
//! yields a track-adjusted coordinate; consecutive coordinates are then
//! reconciled so that each segment leaves the previous station and enters
//! the next one along snapped compass directions. Where a single bend
//! cannot reconcile the two directions on the 45-degree grid, a helper
//! station is synthesized at the segment midpoint and the connection is
//! re-resolved through it.

use tracing::warn;

use crate::config::Config;
use crate::geometry::{Rotation, Vector};
use crate::identifiers::{LineIdentifier, StationIdentifier};
use crate::models::line_group::locked as locked_group;
use crate::models::preferred_track::PreferredTrack;
use crate::models::station::{locked, SharedStation, Station};
use crate::models::traits::{LineRenderer, StationProvider};
use crate::models::types::{Axis, Result, RoutingError, Stop};

/// A transit line: an itinerary of stops plus its routed path.
pub struct Line {
    name: LineIdentifier,
    stops: Vec<Stop>,
    weight: Option<f64>,
    speed: Option<f64>,
    declared_length: Option<f64>,
    beck_style: bool,
    renderer: Box<dyn LineRenderer>,

    path: Vec<Vector>,
    preceding_stop: Option<SharedStation>,
    preceding_dir: Option<Rotation>,
}

/// A pending connection on the routing worklist.
struct ConnectionTask {
    station: SharedStation,
    next_base: Vector,
    track: PreferredTrack,
    /// Whether a failed bend may synthesize a helper station. Retries
    /// and helper connections run with this cleared, so a helper never
    /// spawns further helpers.
    allow_helper: bool,
}

enum StepOutcome {
    Connected(Vector),
    /// No grid-aligned bend exists and helpers are allowed; nothing has
    /// been committed for this task yet.
    Blocked {
        exit_dir: Rotation,
        from_stop: SharedStation,
    },
}

impl Line {
    pub fn new(name: LineIdentifier, stops: Vec<Stop>, renderer: Box<dyn LineRenderer>) -> Self {
        Self {
            name,
            stops,
            weight: None,
            speed: None,
            declared_length: None,
            beck_style: true,
            renderer,
            path: Vec::new(),
            preceding_stop: None,
            preceding_dir: None,
        }
    }

    /// Edge weight for layout distortion; not interpreted by routing.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Animation speed override in units per second.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Declared total length of a pre-specified path. When positive, the
    /// routing pass is skipped and this length drives the timing.
    pub fn with_declared_length(mut self, length: f64) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Per-line Beck-style override.
    pub fn with_beck_style(mut self, beck_style: bool) -> Self {
        self.beck_style = beck_style;
        self
    }

    pub fn name(&self) -> &LineIdentifier {
        &self.name
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, station: &StationIdentifier) -> Option<&Stop> {
        self.stops.iter().find(|stop| &stop.station == station)
    }

    /// First and last stop of the itinerary.
    pub fn termini(&self) -> Option<(&Stop, &Stop)> {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => Some((first, last)),
            _ => None,
        }
    }

    pub fn path(&self) -> &[Vector] {
        &self.path
    }

    /// Route (if necessary) and draw the line.
    ///
    /// Returns the animation duration in seconds.
    pub fn draw(
        &mut self,
        delay_seconds: f64,
        animate: bool,
        reverse: bool,
        provider: &mut dyn StationProvider,
        config: &Config,
    ) -> Result<f64> {
        let predrawn = self.declared_length.is_some_and(|length| length > 0.0);
        if !predrawn && self.path.is_empty() {
            self.create_line(provider, config, delay_seconds, animate)?;
        }
        let duration = self.animation_duration(animate, config);
        let group = provider.line_group_by_id(&self.name);
        let color_deviation = {
            let mut group = locked_group(&group);
            group.add_line(self.name.clone());
            group.stroke_color()
        };
        self.renderer.draw(
            delay_seconds,
            duration,
            reverse,
            &self.path,
            self.total_length(),
            color_deviation,
        );
        Ok(duration)
    }

    /// Morph the already-drawn line onto a new path.
    ///
    /// Paths with differing node counts are collapsed to their termini
    /// pair before morphing. Moving a line that has never been drawn (or
    /// onto a degenerate path) is a no-op.
    pub fn move_path(
        &mut self,
        delay_seconds: f64,
        duration_seconds: f64,
        new_path: Vec<Vector>,
        color_deviation: f64,
        provider: &mut dyn StationProvider,
    ) {
        if self.path.len() < 2 || new_path.len() < 2 {
            warn!(line = %self.name, "trying to move a non-existing line");
            return;
        }
        let mut from = self.path.clone();
        let mut to = new_path;
        if from.len() != to.len() {
            from = vec![from[0], from[from.len() - 1]];
            to = vec![to[0], to[to.len() - 1]];
        }
        let group = provider.line_group_by_id(&self.name);
        let color_from = locked_group(&group).stroke_color();
        self.renderer
            .move_path(delay_seconds, duration_seconds, &from, &to, color_from, color_deviation);
        locked_group(&group).set_stroke_color(color_deviation);
        self.path = to;
    }

    /// Erase the line and release its track assignments, including those
    /// held at helper stations between consecutive stops.
    pub fn erase(
        &mut self,
        delay_seconds: f64,
        animate: bool,
        reverse: bool,
        provider: &mut dyn StationProvider,
        config: &Config,
    ) -> Result<f64> {
        if self.path.len() < 2 && self.declared_length.is_none() {
            warn!(line = %self.name, "erasing a line that has no drawn path");
        }
        let duration = self.animation_duration(animate, config);
        let group = provider.line_group_by_id(&self.name);
        locked_group(&group).remove_line(&self.name);
        self.renderer
            .erase(delay_seconds, duration, reverse, self.total_length());
        for j in 0..self.stops.len() {
            let station = self.resolve(provider, j)?;
            {
                let mut station = locked(&station);
                station.remove_line(&self.name);
                station.draw(delay_seconds);
            }
            if j > 0 {
                let helper_id = StationIdentifier::helper_between(
                    &self.stops[j - 1].station,
                    &self.stops[j].station,
                );
                if let Some(helper) = provider.station_by_id(&helper_id) {
                    locked(&helper).remove_line(&self.name);
                }
            }
        }
        Ok(duration)
    }

    pub fn speed(&self, config: &Config) -> f64 {
        self.speed.filter(|speed| *speed > 0.0).unwrap_or(config.anim_speed)
    }

    /// Declared length when pre-specified, computed path length otherwise.
    pub fn total_length(&self) -> f64 {
        if let Some(length) = self.declared_length {
            if length > 0.0 {
                return length;
            }
        }
        self.path
            .windows(2)
            .map(|pair| pair[0].delta(pair[1]).length())
            .sum()
    }

    pub fn animation_duration_seconds(&self, config: &Config) -> f64 {
        self.animation_duration(true, config)
    }

    fn animation_duration(&self, animate: bool, config: &Config) -> f64 {
        if !animate {
            return 0.0;
        }
        self.total_length() / self.speed(config)
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    fn create_line(
        &mut self,
        provider: &mut dyn StationProvider,
        config: &Config,
        delay_seconds: f64,
        animate: bool,
    ) -> Result<()> {
        let mut track = PreferredTrack::positive();
        for j in 0..self.stops.len() {
            let hint = self.stops[j].track_hint.clone();
            track = track.updated(&hint);
            let station = self.resolve(provider, j)?;
            if self.path.is_empty() {
                // A continuation of an already-routed line of the same
                // name sticks to its established track.
                track = track.from_existing(locked(&station).slot_for_line(&self.name));
            }
            let own_base = locked(&station).base_coords();
            let next_base = self.next_stop_base_coord(provider, j, own_base)?;
            let coord =
                self.create_connection(&station, next_base, track, provider, config, delay_seconds, animate);
            self.stops[j].coord = Some(coord);
            track = track.reduced();
        }
        Ok(())
    }

    fn resolve(&self, provider: &dyn StationProvider, index: usize) -> Result<SharedStation> {
        let id = &self.stops[index].station;
        provider
            .station_by_id(id)
            .ok_or_else(|| RoutingError::UnknownStation {
                line: self.name.clone(),
                station: id.clone(),
            })
    }

    fn next_stop_base_coord(
        &self,
        provider: &dyn StationProvider,
        index: usize,
        default: Vector,
    ) -> Result<Vector> {
        if index + 1 < self.stops.len() {
            let station = self.resolve(provider, index + 1)?;
            let base = locked(&station).base_coords();
            Ok(base)
        } else {
            Ok(default)
        }
    }

    /// Connect one stop to the path, resolving failed bends through
    /// helper stations on an explicit worklist.
    fn create_connection(
        &mut self,
        station: &SharedStation,
        next_base: Vector,
        track: PreferredTrack,
        provider: &mut dyn StationProvider,
        config: &Config,
        delay_seconds: f64,
        animate: bool,
    ) -> Vector {
        let mut coord = locked(station).base_coords();
        let mut tasks = vec![ConnectionTask {
            station: station.clone(),
            next_base,
            track,
            allow_helper: true,
        }];
        while let Some(task) = tasks.pop() {
            match self.connect_step(&task, config, delay_seconds, animate) {
                StepOutcome::Connected(connected) => coord = connected,
                StepOutcome::Blocked { exit_dir, from_stop } => {
                    let helper =
                        self.get_or_create_helper_stop(exit_dir, &from_stop, &task.station, provider);
                    self.preceding_dir = Some(exit_dir.reversed());
                    let retry_base = locked(&task.station).base_coords();
                    // Retry the station after the helper; neither may
                    // synthesize further helpers.
                    tasks.push(ConnectionTask {
                        station: task.station.clone(),
                        next_base: task.next_base,
                        track: task.track,
                        allow_helper: false,
                    });
                    tasks.push(ConnectionTask {
                        station: helper,
                        next_base: retry_base,
                        track: task.track.reduced(),
                        allow_helper: false,
                    });
                }
            }
        }
        coord
    }

    fn connect_step(
        &mut self,
        task: &ConnectionTask,
        config: &Config,
        delay_seconds: f64,
        animate: bool,
    ) -> StepOutcome {
        let (station_id, station_rotation, new_dir, axis, new_track, new_coord) = {
            let station = locked(&task.station);
            let rotation = station.rotation();
            let new_dir = self.stop_orientation(&station, task.next_base);
            let axis = Axis::for_incoming(new_dir);
            let new_track = station.assign_track(axis, &task.track, &self.name);
            let new_coord = station.rotated_track_coordinates(new_dir, new_track, config);
            (station.id().clone(), rotation, new_dir, axis, new_track, new_coord)
        };

        if let Some(&old_coord) = self.path.last() {
            let exit_dir = self.next_preceding_dir(old_coord, new_coord);
            self.preceding_dir = Some(exit_dir);

            let station_dir = new_dir.add(station_rotation);
            let found = self.insert_node(old_coord, exit_dir, new_coord, station_dir, config);
            if !found {
                if task.allow_helper {
                    if let Some(from_stop) = self.preceding_stop.clone() {
                        return StepOutcome::Blocked { exit_dir, from_stop };
                    }
                }
                warn!(line = %self.name, station = %station_id, "path to fix");
            }
            self.preceding_dir = Some(station_dir);
        }

        locked(&task.station).add_line(&self.name, axis, new_track);
        self.path.push(new_coord);
        let station_delay = delay_seconds + self.animation_duration(animate, config);
        {
            let mut station = locked(&task.station);
            station.draw(station_delay);
        }
        self.preceding_stop = Some(task.station.clone());
        StepOutcome::Connected(new_coord)
    }

    /// Station-relative entry direction for the stop being connected.
    ///
    /// Mid-path, the bearing from the upcoming stop back to the previous
    /// path coordinate is snapped to the station's quarter grid. At the
    /// start of a path, a same-named line already present at the station
    /// keeps that assignment's axis (half snap); otherwise the bearing
    /// toward the next stop picks the quarter.
    fn stop_orientation(&mut self, station: &Station, next_base: Vector) -> Rotation {
        let rotation = station.rotation();
        if let Some(&old_coord) = self.path.last() {
            return next_base.delta(old_coord).inclination().quarter_direction(rotation);
        }
        let delta = station.base_coords().delta(next_base);
        if let Some(slot) = station.slot_for_line(&self.name) {
            let orientation = delta.inclination().half_direction(rotation, slot.axis.tangent());
            if self.preceding_dir.is_none() {
                self.preceding_dir = Some(orientation.add(rotation).reversed());
            }
            return orientation;
        }
        delta.inclination().quarter_direction(rotation)
    }

    /// Direction in which the path leaves the previous station.
    ///
    /// Derived from the straight line for the first segment; afterwards
    /// exit and entry directions alternate front/back along the chain.
    fn next_preceding_dir(&self, old_coord: Vector, new_coord: Vector) -> Rotation {
        match self.preceding_dir {
            Some(dir) => dir.reversed(),
            None => {
                let basis = self
                    .preceding_stop
                    .as_ref()
                    .map_or(Rotation::NORTH, |stop| locked(stop).rotation());
                old_coord
                    .delta(new_coord)
                    .inclination()
                    .quarter_direction(basis)
                    .add(basis)
            }
        }
    }

    /// Reconcile one segment with the 45-degree grid.
    ///
    /// Returns false when no single bend forward of both endpoints exists.
    fn insert_node(
        &mut self,
        from: Vector,
        from_dir: Rotation,
        to: Vector,
        to_dir: Rotation,
        config: &Config,
    ) -> bool {
        if !config.beck_style || !self.beck_style {
            return true;
        }
        let delta = from.delta(to);
        let exit = Vector::UNIT.rotate(from_dir);
        let entry = Vector::UNIT.rotate(to_dir);
        if delta.is_delta_matching_parallel(exit, entry) {
            return true;
        }
        match delta.solve_delta_for_intersection(exit, entry) {
            Some((a, b)) if a > config.min_node_distance && b > config.min_node_distance => {
                self.path.push(from.add(exit.with_length(a)));
                true
            }
            _ => false,
        }
    }

    /// Resolve or synthesize the helper station between two stations.
    fn get_or_create_helper_stop(
        &self,
        exit_dir: Rotation,
        from: &SharedStation,
        to: &SharedStation,
        provider: &mut dyn StationProvider,
    ) -> SharedStation {
        let (from_id, from_base, from_rotation) = {
            let station = locked(from);
            (station.id().clone(), station.base_coords(), station.rotation())
        };
        let (to_id, to_base) = {
            let station = locked(to);
            (station.id().clone(), station.base_coords())
        };
        let id = StationIdentifier::helper_between(&from_id, &to_id);
        if let Some(existing) = provider.station_by_id(&id) {
            return existing;
        }
        let bearing = from_base.delta(to_base).inclination();
        let rotation = from_rotation.nudged(exit_dir.delta(bearing));
        let coords = from_base.between(to_base, 0.5);
        provider.create_virtual_stop(id, coords, rotation)
    }
}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Line")
            .field("name", &self.name)
            .field("stops", &self.stops)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
