/// Longitude span covered by the base map, in degrees east.
pub const LON_MIN: f64 = 95.0;
pub const LON_MAX: f64 = 141.0;

/// Latitude span covered by the base map, in degrees north.
pub const LAT_MIN: f64 = -12.0;
pub const LAT_MAX: f64 = 6.0;

/// Two world positions closer than this on every axis are the same spot.
pub const POSITION_TOLERANCE: f32 = 0.001;

/// Base map glTF is authored Z-up; rotate it onto the Y-up world.
pub const BASE_MAP_ROTATION_X: f32 = -std::f32::consts::FRAC_PI_2;
pub const BASE_MAP_SCALE: f32 = 60.0;

/// Fraction of the map height markers sit above the map floor.
pub const MARKER_BASE_LIFT_RATIO: f32 = 0.01;
