use super::coordinator::FlightPlan;
use crate::engine::assets::landmark::Landmark;
use crate::engine::error::MapError;
use crate::engine::transport::path::TransportKind;
use bevy::prelude::*;

/// A landmark was chosen by clicking its marker or from the web list.
///
/// List selections carry no `world_pos`; it is projected from the
/// landmark's coordinates.
#[derive(Event, Debug, Clone)]
pub struct LandmarkSelected {
    pub landmark_id: String,
    pub world_pos: Option<Vec3>,
}

/// The coordinator took a selection: a flight was dispatched or the target
/// is the current position. Ignored selections never produce one.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SelectionAccepted {
    pub landmark_id: String,
}

/// The coordinator accepted a selection and wants a vehicle to fly it.
#[derive(Event, Debug, Clone)]
pub struct FlightDispatched {
    pub plan: FlightPlan,
}

#[derive(Event, Debug, Clone)]
pub struct FlightStarted {
    pub landmark_id: String,
    pub transport: TransportKind,
    pub duration: f32,
}

/// The animator reached the end of a run. Only the coordinator consumes this.
#[derive(Event, Debug, Clone)]
pub struct TransportFinished {
    pub landmark_id: String,
    pub target_pos: Vec3,
}

/// The animator refused a dispatched flight.
#[derive(Event, Debug, Clone)]
pub struct FlightAborted {
    pub landmark_id: String,
    pub reason: MapError,
}

/// A flight ended at `target_pos`, either after an animation or immediately
/// when the target was already the current position.
#[derive(Event, Debug, Clone)]
pub struct FlightCompleted {
    pub landmark_id: String,
    pub target_pos: Vec3,
}

/// The information overlay for `landmark` should open.
#[derive(Event, Debug, Clone)]
pub struct OverlayOpenRequested {
    pub landmark: Landmark,
}

/// Pointer hover moved onto a marker, or off all markers.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HoverChanged {
    pub landmark_id: Option<String>,
}

/// Hover driven from outside the scene, e.g. a list entry under the cursor.
///
/// Previews the landmark's model like pointer hover, never starts a flight.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ExternalHover {
    pub landmark_id: Option<String>,
}
