//! Runtime diagnostics and native overlays.
//!
//! Frame rate reporting to the frontend and the native status lines.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Native overlay line describing the active or last flight.
pub mod flight_status;
