//! Fly-to request arbitration.
//!
//! Turns landmark selections into at most one pending flight, picks plane or
//! train, tracks where the last flight ended and opens the overlay on
//! arrival. The transport animator consumes `FlightDispatched` and reports
//! back with `TransportFinished` or `FlightAborted`.

/// Pure request state machine: pending lock, last position, transport choice.
pub mod coordinator;

/// Events exchanged between picking, the coordinator, the animator and the web bridge.
pub mod events;

/// Systems wiring the coordinator into the frame.
pub mod systems;

use crate::engine::assets::bounds::MapBounds;
use bevy::prelude::*;
use coordinator::FlightCoordinator;
use events::*;
use systems::*;

/// Frame ordering for the fly-to pipeline.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightSet {
    /// Pointer picking and external requests produce selections.
    Input,
    /// Selections become flight plans.
    Arbitrate,
    /// Vehicles start, move and finish.
    Animate,
    /// Arrivals and aborts update the coordinator.
    Resolve,
}

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightCoordinator>()
            .init_resource::<ExternalHover>()
            .add_event::<LandmarkSelected>()
            .add_event::<SelectionAccepted>()
            .add_event::<FlightDispatched>()
            .add_event::<FlightStarted>()
            .add_event::<TransportFinished>()
            .add_event::<FlightAborted>()
            .add_event::<FlightCompleted>()
            .add_event::<OverlayOpenRequested>()
            .add_event::<HoverChanged>()
            .configure_sets(
                Update,
                (
                    FlightSet::Input,
                    FlightSet::Arbitrate,
                    FlightSet::Animate,
                    FlightSet::Resolve,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (initialize_home_position, reproject_last_position)
                        .chain()
                        .run_if(resource_exists_and_changed::<MapBounds>),
                    handle_landmark_selection,
                )
                    .chain()
                    .in_set(FlightSet::Arbitrate),
            )
            .add_systems(
                Update,
                (handle_transport_finished, handle_flight_aborted).in_set(FlightSet::Resolve),
            );
    }
}
