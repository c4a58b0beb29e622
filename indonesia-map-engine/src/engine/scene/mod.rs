//! Map scene: base map, landmark markers and everything the pointer touches.
//!
//! The base map is measured once its meshes are instanced; markers are
//! placed from those bounds and re-placed when they change. Hovering a
//! marker previews its model, clicking it asks for a flight.

/// Base map spawning and bounds measurement.
pub mod base_map;

/// Landmark markers and their screen-space number labels.
pub mod markers;

/// Pointer hover and click selection against marker hit cards.
pub mod picking;

/// Lat/lon to map-space projection.
pub mod projection;

/// Ray intersection against oriented boxes.
pub mod ray;

/// Scale and spin tweens for previewed models.
pub mod tween;

use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::landmark::Landmarks;
use crate::engine::assets::model_resources::{
    ModelResourceStats, drive_model_requests, finish_model_releases, recenter_loaded_models,
    resolve_model_loads,
};
use crate::engine::core::app_state::AppState;
use crate::engine::flight::FlightSet;
use base_map::{compute_map_bounds, watch_base_map_load, watch_base_map_reload};
use bevy::prelude::*;
use markers::{position_marker_labels, sync_markers_to_bounds};
use picking::{PointerHover, apply_marker_hover, select_marker_on_click, update_pointer_hover};
use tween::{advance_scale_tweens, advance_spins, clear_settled_tweens};

pub struct MapScenePlugin;

impl Plugin for MapScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerHover>()
            .init_resource::<ModelResourceStats>()
            .add_systems(
                Update,
                (watch_base_map_reload, compute_map_bounds).chain(),
            )
            .add_systems(
                Update,
                watch_base_map_load.run_if(in_state(AppState::Loading)),
            )
            .add_systems(
                Update,
                sync_markers_to_bounds
                    .run_if(resource_exists::<MapBounds>.and(resource_exists::<Landmarks>))
                    .after(compute_map_bounds),
            )
            .add_systems(
                Update,
                (update_pointer_hover, select_marker_on_click)
                    .chain()
                    .in_set(FlightSet::Input)
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(
                Update,
                (
                    apply_marker_hover,
                    drive_model_requests,
                    resolve_model_loads,
                    recenter_loaded_models,
                    advance_scale_tweens,
                    advance_spins,
                    finish_model_releases,
                    clear_settled_tweens,
                )
                    .chain()
                    .after(FlightSet::Input),
            )
            .add_systems(Update, position_marker_labels.after(sync_markers_to_bounds));
    }
}
