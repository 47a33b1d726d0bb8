pub mod line;
pub mod line_group;
pub mod preferred_track;
pub mod station;
pub mod traits;
pub mod types;
