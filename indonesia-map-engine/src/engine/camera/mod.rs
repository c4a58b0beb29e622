//! Viewport camera for map navigation.
//!
//! Orbits a focus point with damping. Left-drag rotates and right-drag pans.
//! The wheel zooms within fixed limits and WASD slides the focus across the
//! ground plane.

/// Orbit state resource and the controller system driving the camera.
pub mod viewport_camera;
