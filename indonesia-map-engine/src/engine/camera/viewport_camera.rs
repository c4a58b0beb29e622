use crate::engine::assets::bounds::MapBounds;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use constants::camera::{
    DRAG_PAN_SENSITIVITY, KEYBOARD_MOVE_SPEED, ORBIT_DAMPING, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_PITCH_MAX,
    ORBIT_PITCH_MIN, ORBIT_PITCH_SENSITIVITY, ORBIT_YAW_SENSITIVITY, ZOOM_STEP_LINE,
    ZOOM_STEP_PIXEL,
};

/// Target orbit pose. The camera transform eases towards it each frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewportCamera {
    /// Orbit state that reproduces a camera at `eye` looking at `target`.
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        let (yaw, pitch) = if offset.length_squared() > f32::EPSILON {
            let dir = offset.normalize();
            (dir.x.atan2(dir.z), -dir.y.clamp(-1.0, 1.0).asin())
        } else {
            (0.0, ORBIT_PITCH_MIN)
        };

        Self {
            focus_point: target,
            distance,
            yaw,
            pitch: pitch.clamp(ORBIT_PITCH_MIN, ORBIT_PITCH_MAX),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Eye position and orientation for the current orbit state.
    pub fn pose(&self) -> (Vec3, Quat) {
        let rotation = self.rotation();
        (self.focus_point + rotation * Vec3::Z * self.distance, rotation)
    }

    pub fn orbit(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * ORBIT_YAW_SENSITIVITY;
        self.pitch = (self.pitch - mouse_delta.y * ORBIT_PITCH_SENSITIVITY)
            .clamp(ORBIT_PITCH_MIN, ORBIT_PITCH_MAX);
    }

    /// Positive steps move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance - steps).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    /// Slide the focus along the ground; `input.y` is forward, `input.x` right.
    pub fn pan(&mut self, input: Vec2, dt: f32) {
        if input == Vec2::ZERO {
            return;
        }
        let (forward, right) = ground_basis(self.yaw);
        let direction = (forward * input.y + right * input.x).normalize_or_zero();
        self.focus_point += direction * KEYBOARD_MOVE_SPEED * dt;
    }

    /// Drag the map under the cursor. Farther cameras slide further per pixel.
    pub fn drag_pan(&mut self, mouse_delta: Vec2) {
        let (forward, right) = ground_basis(self.yaw);
        let scale = DRAG_PAN_SENSITIVITY * self.distance;
        self.focus_point += (forward * mouse_delta.y - right * mouse_delta.x) * scale;
    }
}

/// Camera forward and right flattened onto the ground plane.
pub fn ground_basis(yaw: f32) -> (Vec3, Vec3) {
    let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
    let right = forward.cross(Vec3::Y);
    (forward, right)
}

fn scroll_steps(events: &mut EventReader<MouseWheel>) -> f32 {
    events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y * ZOOM_STEP_LINE,
            MouseScrollUnit::Pixel => ev.y * ZOOM_STEP_PIXEL,
        })
        .sum()
}

/// Left-drag orbits, right-drag pans.
fn apply_mouse_drag(
    viewport: &mut ViewportCamera,
    mouse_button: &ButtonInput<MouseButton>,
    mouse_delta: Vec2,
) {
    if mouse_delta == Vec2::ZERO {
        return;
    }
    if mouse_button.pressed(MouseButton::Left) {
        viewport.orbit(mouse_delta);
    } else if mouse_button.pressed(MouseButton::Right) {
        viewport.drag_pan(mouse_delta);
    }
}

fn keyboard_pan_input(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= 1.0;
    }
    input
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    apply_mouse_drag(&mut viewport, &mouse_button, mouse_delta);

    let steps = scroll_steps(&mut scroll_events);
    if steps.abs() > f32::EPSILON {
        viewport.zoom(steps);
    }

    viewport.pan(keyboard_pan_input(&keyboard), dt);

    let (target_pos, target_rot) = viewport.pose();
    // Damping is tuned per 60 Hz frame.
    let blend = (ORBIT_DAMPING * 60.0 * dt).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, blend);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, blend);
}

/// Aim the orbit at the middle of the map whenever its bounds change.
pub fn focus_on_map_bounds(bounds: Res<MapBounds>, mut viewport: ResMut<ViewportCamera>) {
    let center = bounds.center();
    info!("Camera focus set to map centre {center}");
    viewport.focus_point = Vec3::new(center.x, bounds.min.y, center.z);
}
