//! # transit-schematic
//!
//! Orthogonal line routing for schematic ("Beck style") transit maps.
//!
//! Given an ordered stop sequence, the routing core computes a polyline
//! path that respects each station's preferred entry directions, keeps
//! parallel lines on distinct lateral tracks through shared stations,
//! snaps bends to a 45-degree grid, and synthesizes helper stations
//! where a single bend cannot satisfy the grid.
//!
//! Drawing and animation are collaborator concerns: the core invokes the
//! [`LineRenderer`]/[`StationRenderer`] traits with finished geometry and
//! timing and never touches a concrete backend.
//!
//! ## Example
//!
//! ```
//! use transit_schematic::prelude::*;
//!
//! struct NoopRenderer;
//!
//! impl LineRenderer for NoopRenderer {
//!     fn draw(&mut self, _: f64, _: f64, _: bool, _: &[Vector], _: f64, _: f64) {}
//!     fn move_path(&mut self, _: f64, _: f64, _: &[Vector], _: &[Vector], _: f64, _: f64) {}
//!     fn erase(&mut self, _: f64, _: f64, _: bool, _: f64) {}
//! }
//!
//! let mut provider = StaticStationProvider::new();
//! provider.insert(Station::new("a".into(), Vector::new(10.0, 0.0), Rotation::NORTH));
//! provider.insert(Station::new("b".into(), Vector::new(10.0, 50.0), Rotation::NORTH));
//!
//! let mut line = Line::new(
//!     "s1".into(),
//!     vec![Stop::new("a", ""), Stop::new("b", "")],
//!     Box::new(NoopRenderer),
//! );
//! line.draw(0.0, false, false, &mut provider, &Config::default()).unwrap();
//! assert_eq!(line.path(), &[Vector::new(10.0, 0.0), Vector::new(10.0, 50.0)]);
//! ```

pub mod config;
pub mod geometry;
pub mod identifiers;
pub mod models;
pub mod provider;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::geometry::{Rotation, Vector};
    pub use crate::identifiers::{LineIdentifier, StationIdentifier};
    pub use crate::models::line::Line;
    pub use crate::models::line_group::{LineGroup, SharedLineGroup};
    pub use crate::models::preferred_track::PreferredTrack;
    pub use crate::models::station::{SharedStation, Station};
    pub use crate::models::traits::{LineRenderer, StationProvider, StationRenderer};
    pub use crate::models::types::{
        Axis, Result, RoutingError, Stop, TrackBoundaries, TrackSlot,
    };
    pub use crate::provider::static_provider::StaticStationProvider;
}

pub use prelude::*;
