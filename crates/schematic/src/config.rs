//! Routing configuration.
//!
//! A plain value object handed explicitly to the routing entry points.
//! `Config::default()` is the single well-known default instance; nothing
//! in this crate mutates a config behind the caller's back.

/// Tunable values consumed by the routing core.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Whether to draw in Harry Beck style (segments aligned to a
    /// 45-degree grid, as usually done for public transport maps).
    /// Individual lines can override this.
    pub beck_style: bool,

    /// Minimum distance of an inserted corner from both of its endpoints.
    pub min_node_distance: f64,

    /// Animation speed for lines, in coordinate units per second.
    pub anim_speed: f64,

    /// Distance of neighboring tracks at stations.
    pub line_distance: f64,

    /// Size of a station with a single line.
    pub default_station_dimen: f64,

    /// Extra clearance between a station and its label.
    pub label_distance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            beck_style: true,
            min_node_distance: 0.0,
            anim_speed: 100.0,
            line_distance: 6.0,
            default_station_dimen: 10.0,
            label_distance: 0.0,
        }
    }
}
