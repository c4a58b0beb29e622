//! Startup loading for the map scene.
//!
//! Reads the JSON manifest, builds the landmark catalogue, requests the
//! vehicle models and spawns the base map. Progress feeds the state
//! transition to `Running` and the frontend's loading screen.

/// Map manifest loading and the scene spawning it triggers.
pub mod manifest_loader;

/// Loading milestones tracked until the map bounds are known.
pub mod progress;
