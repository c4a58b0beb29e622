/// Scale used when a landmark record omits one or carries a non-positive value.
pub const DEFAULT_LANDMARK_SCALE: f32 = 0.08;

/// Extra lift applied to every marker above the projected map surface.
pub const LANDMARK_GLOBAL_Y_OFFSET: f32 = 0.12;

/// Island tag shared by landmarks that do not belong to a single island.
pub const GENERIC_ISLAND: &str = "Archipelago";

/// Substrings marking a model URI as a placeholder that never starts a flight.
pub const DEFAULT_EXCLUDED_MODEL_PATTERNS: &[&str] = &["placeholder"];

// Label and hit area
pub const LABEL_HEIGHT: f32 = 0.10;
pub const LABEL_FONT_SIZE: f32 = 18.0;
pub const HITBOX_WIDTH: f32 = 0.3;
pub const HITBOX_HEIGHT: f32 = 0.8;

// Hover preview
pub const HOVER_GROW_SECONDS: f32 = 0.6;
pub const HOVER_SHRINK_SECONDS: f32 = 0.5;
pub const HOVER_SPIN_PERIOD_SECONDS: f32 = 6.0;
pub const COLLAPSED_MODEL_SCALE: f32 = 0.001;
/// Billboard hit area is a flat card; give it a sliver of depth for the slab test.
pub const HITBOX_DEPTH: f32 = 0.02;
