//! In-memory station provider.
//!
//! Backs the routing core with plain hash-map lookups. Virtual stops
//! created during routing live alongside the real stations; line groups
//! are created lazily on first access.

use std::collections::HashMap;

use crate::geometry::{Rotation, Vector};
use crate::identifiers::{LineIdentifier, StationIdentifier};
use crate::models::line_group::{LineGroup, SharedLineGroup};
use crate::models::station::{SharedStation, Station};
use crate::models::traits::StationProvider;

/// In-memory [`StationProvider`] implementation.
#[derive(Default)]
pub struct StaticStationProvider {
    stations: HashMap<StationIdentifier, SharedStation>,
    line_groups: HashMap<LineIdentifier, SharedLineGroup>,
}

impl StaticStationProvider {
    /// Create a new empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from existing stations.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut provider = Self::new();
        for station in stations {
            provider.insert(station);
        }
        provider
    }

    /// Register a station, replacing any previous one with the same id.
    pub fn insert(&mut self, station: Station) -> SharedStation {
        let id = station.id().clone();
        let shared = station.shared();
        self.stations.insert(id, shared.clone());
        shared
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &StationIdentifier> {
        self.stations.keys()
    }
}

impl StationProvider for StaticStationProvider {
    fn station_by_id(&self, id: &StationIdentifier) -> Option<SharedStation> {
        self.stations.get(id).cloned()
    }

    fn create_virtual_stop(
        &mut self,
        id: StationIdentifier,
        base_coords: Vector,
        rotation: Rotation,
    ) -> SharedStation {
        self.insert(Station::new(id, base_coords, rotation))
    }

    fn line_group_by_id(&mut self, name: &LineIdentifier) -> SharedLineGroup {
        self.line_groups
            .entry(name.clone())
            .or_insert_with(|| LineGroup::new().shared())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::station::locked;

    #[test]
    fn test_empty_provider() {
        let provider = StaticStationProvider::new();
        assert_eq!(provider.station_count(), 0);
        assert!(provider.station_by_id(&StationIdentifier::new("a")).is_none());
    }

    #[test]
    fn test_lookup_and_replace() {
        let mut provider = StaticStationProvider::from_stations(vec![Station::new(
            StationIdentifier::new("a"),
            Vector::new(1.0, 2.0),
            Rotation::NORTH,
        )]);

        let station = provider.station_by_id(&StationIdentifier::new("a")).unwrap();
        assert_eq!(locked(&station).base_coords(), Vector::new(1.0, 2.0));

        provider.insert(Station::new(
            StationIdentifier::new("a"),
            Vector::new(3.0, 4.0),
            Rotation::EAST,
        ));
        let station = provider.station_by_id(&StationIdentifier::new("a")).unwrap();
        assert_eq!(locked(&station).base_coords(), Vector::new(3.0, 4.0));
        assert_eq!(provider.station_count(), 1);
    }

    #[test]
    fn test_create_virtual_stop_is_resolvable() {
        let mut provider = StaticStationProvider::new();
        let created = provider.create_virtual_stop(
            StationIdentifier::new("h_a_b"),
            Vector::new(5.0, 5.0),
            Rotation::NORTH_EAST,
        );
        let resolved = provider.station_by_id(&StationIdentifier::new("h_a_b")).unwrap();
        assert!(std::sync::Arc::ptr_eq(&created, &resolved));
        assert_eq!(locked(&resolved).rotation(), Rotation::NORTH_EAST);
        assert_eq!(provider.station_ids().count(), 1);
    }

    #[test]
    fn test_line_groups_are_shared_by_name() {
        let mut provider = StaticStationProvider::new();
        let group = provider.line_group_by_id(&LineIdentifier::new("s1"));
        group.lock().unwrap().set_stroke_color(0.5);

        let same = provider.line_group_by_id(&LineIdentifier::new("s1"));
        assert_eq!(same.lock().unwrap().stroke_color(), 0.5);

        let other = provider.line_group_by_id(&LineIdentifier::new("s2"));
        assert_eq!(other.lock().unwrap().stroke_color(), 0.0);
    }
}
