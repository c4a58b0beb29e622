//! Compile-time configuration shared across the map workspace.

/// Camera placement, orbit limits and free-look speed.
pub mod camera;

/// Geographic extent of the map and the base map transform.
pub mod coordinate_system;

/// Landmark marker sizing, hover animation timings and defaults.
pub mod landmark;

/// Vehicle speeds, durations and rail layout for fly-to animations.
pub mod transport;
