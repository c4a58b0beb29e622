//! Map data and model assets.
//!
//! Holds the manifest and landmark catalogue, the base map's world-space
//! bounds, and the lifecycle of landmark models loaded on hover.

/// World-space bounds of the base map.
pub mod bounds;

/// Landmark records and the validated catalogue.
pub mod landmark;

/// On-demand landmark models: load, attach, shrink and dispose.
pub mod model_resources;

/// JSON manifest describing the base map, vehicles and landmarks.
pub mod scene_manifest;
