use bevy::math::Vec3;

pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 10.0, 12.0);
pub const CAMERA_FOV_DEGREES: f32 = 20.0;

pub const ORBIT_MIN_DISTANCE: f32 = 2.5;
pub const ORBIT_MAX_DISTANCE: f32 = 25.0;
/// Fraction of the remaining distance to the target pose covered per 60 Hz frame.
pub const ORBIT_DAMPING: f32 = 0.08;
pub const ORBIT_YAW_SENSITIVITY: f32 = 0.0035;
pub const ORBIT_PITCH_SENSITIVITY: f32 = 0.0030;
/// Keeps the camera above the map and short of looking straight down.
pub const ORBIT_PITCH_MIN: f32 = -1.45;
pub const ORBIT_PITCH_MAX: f32 = -0.05;
pub const ZOOM_STEP_LINE: f32 = 1.0;
pub const ZOOM_STEP_PIXEL: f32 = 0.05;

/// Free-look pan speed in world units per second.
pub const KEYBOARD_MOVE_SPEED: f32 = 6.0;
/// World units the focus slides per dragged pixel, per unit of orbit distance.
pub const DRAG_PAN_SENSITIVITY: f32 = 0.0012;
