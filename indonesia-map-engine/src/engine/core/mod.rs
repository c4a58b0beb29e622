//! Core application setup and state management.
//!
//! Builds the app for native and WASM targets, owns the loading to running
//! transition and the startup scene (camera, lights, native overlays).

/// Plugin registration, startup scene and system scheduling.
pub mod app_setup;

/// Loading and running states and the transition between them.
pub mod app_state;

/// Platform-specific window configuration.
///
/// Binds to the page canvas on web targets.
pub mod window_config;
