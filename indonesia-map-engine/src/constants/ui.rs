use bevy::color::Color;

pub const WINDOW_TITLE: &str = "Indonesia 3D Map";
pub const CANVAS_SELECTOR: &str = "#bevy";

pub const CLEAR_COLOR: Color = Color::srgb(0.05, 0.09, 0.16);
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

pub const OVERLAY_FONT_SIZE: f32 = 16.0;

/// Seconds between `fps_update` notifications.
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;
