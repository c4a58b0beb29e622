//! Vehicle animation between landmarks.
//!
//! A dispatched flight becomes a [`job::TransportRun`]: an eased parametric
//! path sampled every frame for position and heading. Planes follow a
//! parabolic arc, trains hug the ground and may lay rails. Exactly one run
//! is active at a time and each finished run reports once.

/// Systems starting, advancing and killing runs.
pub mod animator;

/// The single active run and its per-frame stepping.
pub mod job;

/// Route geometry, easing and heading for both vehicle kinds.
pub mod path;

/// Rail layout under train runs.
pub mod rails;

/// Vehicle model handles, readiness checks and vehicle entities.
pub mod vehicles;

use crate::engine::core::app_state::AppState;
use crate::engine::flight::FlightSet;
use animator::{TransportSettings, advance_transport_job, kill_transport_job, start_transport_runs};
use bevy::prelude::*;
use job::TransportJob;

pub struct TransportPlugin;

impl Plugin for TransportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TransportJob>()
            .init_resource::<TransportSettings>()
            .add_systems(
                Update,
                (start_transport_runs, advance_transport_job)
                    .chain()
                    .in_set(FlightSet::Animate),
            )
            .add_systems(OnExit(AppState::Running), kill_transport_job);
    }
}
