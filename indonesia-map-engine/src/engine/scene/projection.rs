use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::landmark::Landmark;
use crate::engine::error::MapError;
use bevy::prelude::*;
use constants::coordinate_system::{
    LAT_MAX, LAT_MIN, LON_MAX, LON_MIN, MARKER_BASE_LIFT_RATIO, POSITION_TOLERANCE,
};
use constants::landmark::LANDMARK_GLOBAL_Y_OFFSET;

/// Map a geographic coordinate onto the base map.
///
/// Longitude spans the map's X extent west to east, latitude its Z extent
/// with north at `min.z`. Coordinates outside Indonesia clamp to the map
/// edge. Returns `None` without bounds or without both coordinates.
pub fn project(
    latitude: Option<f64>,
    longitude: Option<f64>,
    bounds: Option<&MapBounds>,
    z_offset: f32,
) -> Option<Vec3> {
    let bounds = bounds?;
    let (lat, lon) = (latitude?, longitude?);

    let lon_ratio = longitude_ratio(lon);
    let lat_ratio = latitude_ratio(lat);

    let x = bounds.min.x + lon_ratio * (bounds.max.x - bounds.min.x);
    let z = bounds.max.z - lat_ratio * (bounds.max.z - bounds.min.z) + z_offset;
    let y = bounds.min.y
        + (bounds.max.y - bounds.min.y) * MARKER_BASE_LIFT_RATIO
        + LANDMARK_GLOBAL_Y_OFFSET;

    Some(Vec3::new(x, y, z))
}

pub fn longitude_ratio(lon: f64) -> f32 {
    ((lon - LON_MIN) / (LON_MAX - LON_MIN)).clamp(0.0, 1.0) as f32
}

pub fn latitude_ratio(lat: f64) -> f32 {
    ((lat - LAT_MIN) / (LAT_MAX - LAT_MIN)).clamp(0.0, 1.0) as f32
}

/// World position of a landmark's marker.
pub fn project_landmark(landmark: &Landmark, bounds: Option<&MapBounds>) -> Result<Vec3, MapError> {
    let missing = |reason| MapError::MissingGeometry {
        id: landmark.id.clone(),
        reason,
    };

    if bounds.is_none() {
        return Err(missing("map bounds not ready"));
    }
    project(
        landmark.latitude,
        landmark.longitude,
        bounds,
        landmark.z_index,
    )
    .ok_or_else(|| missing("no latitude/longitude"))
}

/// True when every axis differs by less than the position tolerance.
pub fn is_same_position(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().cmplt(Vec3::splat(POSITION_TOLERANCE)).all()
}
