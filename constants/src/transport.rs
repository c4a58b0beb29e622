use bevy::math::Vec3;

pub const PLANE_SPEED: f32 = 4.5;
pub const PLANE_MIN_DURATION: f32 = 1.5;
pub const PLANE_ARC_CLEARANCE: f32 = 0.6;
pub const PLANE_LOOKAHEAD: f32 = 2.0;
pub const PLANE_SCALE: f32 = 0.014;

pub const TRAIN_SPEED: f32 = 2.8;
pub const TRAIN_MIN_DURATION: f32 = 2.5;
pub const TRAIN_Y_OFFSET: f32 = 0.2;
pub const TRAIN_LOOKAHEAD: f32 = 1.5;
pub const TRAIN_SCALE: f32 = 0.012;

/// Distance between consecutive rail pieces along a train path.
pub const RAIL_SPACING: f32 = 1.6;
/// Rails sit slightly below the train so the wheels do not clip.
pub const RAIL_DROP: f32 = 0.02;
pub const RAIL_SCALE: f32 = 0.01;

/// Where the first flight of a session departs from, relative to its target.
pub const FIRST_FLIGHT_OFFSET_X: f32 = 2.5;
pub const FIRST_FLIGHT_CLEARANCE: f32 = 1.2;

/// Hidden vehicles wait here between runs.
pub const VEHICLE_PARK_POSITION: Vec3 = Vec3::new(0.0, -10.0, 0.0);
