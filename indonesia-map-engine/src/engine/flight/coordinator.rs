use crate::engine::assets::landmark::Landmark;
use crate::engine::scene::projection::is_same_position;
use crate::engine::transport::path::TransportKind;
use bevy::prelude::*;
use constants::landmark::DEFAULT_EXCLUDED_MODEL_PATTERNS;
use constants::transport::{FIRST_FLIGHT_CLEARANCE, FIRST_FLIGHT_OFFSET_X};

#[derive(Debug, Clone, PartialEq)]
pub struct FlightRequest {
    pub landmark: Landmark,
    pub target_pos: Vec3,
    pub origin_landmark: Option<Landmark>,
}

/// Everything the animator needs to fly a request.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub request: FlightRequest,
    pub start: Vec3,
    pub end: Vec3,
    pub transport: TransportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownLandmark,
    FlightPending,
    Excluded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Ignored(IgnoreReason),
    /// Target equals the current position; the overlay opens without a flight.
    ArrivedInPlace(Landmark),
    Dispatched(FlightPlan),
}

/// Landmarks whose model is missing or a placeholder never start a flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionRule {
    patterns: Vec<String>,
}

impl ExclusionRule {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn excludes(&self, landmark: &Landmark) -> bool {
        if !landmark.has_model() {
            return true;
        }
        let uri = landmark.model_uri.to_lowercase();
        self.patterns.iter().any(|p| uri.contains(p.as_str()))
    }
}

impl Default for ExclusionRule {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_MODEL_PATTERNS.iter().map(|p| p.to_string()))
    }
}

/// Arbitrates fly-to requests for one map session.
///
/// Owns the last known vehicle position and the pending-flight lock. Only
/// the selection, completion and abort handlers write to it.
#[derive(Resource, Debug, Clone, Default)]
pub struct FlightCoordinator {
    last_position: Option<Vec3>,
    last_landmark: Option<Landmark>,
    pending: Option<FlightRequest>,
    exclusion: ExclusionRule,
}

impl FlightCoordinator {
    pub fn set_exclusion(&mut self, exclusion: ExclusionRule) {
        self.exclusion = exclusion;
    }

    pub fn last_position(&self) -> Option<Vec3> {
        self.last_position
    }

    pub fn last_landmark(&self) -> Option<&Landmark> {
        self.last_landmark.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Seed the session at the home landmark. No-op once a position is known.
    pub fn initialize_home(&mut self, home: &Landmark, position: Vec3) -> bool {
        if self.last_position.is_some() {
            return false;
        }
        self.last_position = Some(position);
        self.last_landmark = Some(home.clone());
        true
    }

    /// Move the known position onto re-measured map bounds. Skipped before
    /// the first position is known and while a flight is in the air.
    pub fn rebase(&mut self, position: Vec3) -> bool {
        if self.pending.is_some() || self.last_position.is_none() {
            return false;
        }
        self.last_position = Some(position);
        true
    }

    pub fn on_landmark_selected(
        &mut self,
        landmark: Option<&Landmark>,
        world_pos: Vec3,
    ) -> SelectionOutcome {
        let Some(landmark) = landmark else {
            return SelectionOutcome::Ignored(IgnoreReason::UnknownLandmark);
        };
        if self.pending.is_some() {
            return SelectionOutcome::Ignored(IgnoreReason::FlightPending);
        }
        if self.exclusion.excludes(landmark) {
            return SelectionOutcome::Ignored(IgnoreReason::Excluded);
        }

        if self
            .last_position
            .is_some_and(|last| is_same_position(world_pos, last))
        {
            self.last_landmark = Some(landmark.clone());
            return SelectionOutcome::ArrivedInPlace(landmark.clone());
        }

        let origin_landmark = self.last_landmark.replace(landmark.clone());
        let transport = choose_transport(origin_landmark.as_ref(), landmark);
        let start = self
            .last_position
            .unwrap_or_else(|| first_flight_origin(world_pos));
        let request = FlightRequest {
            landmark: landmark.clone(),
            target_pos: world_pos,
            origin_landmark,
        };
        self.pending = Some(request.clone());

        SelectionOutcome::Dispatched(FlightPlan {
            request,
            start,
            end: world_pos,
            transport,
        })
    }

    /// Record arrival and release the lock. Returns the landmark whose
    /// overlay should open, or `None` if nothing was pending.
    pub fn on_flight_completed(&mut self, target_pos: Vec3) -> Option<Landmark> {
        let request = self.pending.take()?;
        self.last_position = Some(target_pos);
        Some(request.landmark)
    }

    /// Drop the pending request without moving, restoring the origin landmark.
    pub fn abandon_pending(&mut self) -> Option<FlightRequest> {
        let request = self.pending.take()?;
        self.last_landmark = request.origin_landmark.clone();
        Some(request)
    }
}

/// Train when both ends share a non-generic island, plane otherwise.
pub fn choose_transport(origin: Option<&Landmark>, destination: &Landmark) -> TransportKind {
    match (
        origin.and_then(Landmark::routable_island),
        destination.routable_island(),
    ) {
        (Some(from), Some(to)) if from.eq_ignore_ascii_case(to) => TransportKind::Train,
        _ => TransportKind::Plane,
    }
}

/// The first flight of a session starts west of and above its target.
pub fn first_flight_origin(target: Vec3) -> Vec3 {
    target + Vec3::new(-FIRST_FLIGHT_OFFSET_X, FIRST_FLIGHT_CLEARANCE, 0.0)
}
