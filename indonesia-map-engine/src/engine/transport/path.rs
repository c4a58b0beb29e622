use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;
use constants::transport::{
    PLANE_ARC_CLEARANCE, PLANE_LOOKAHEAD, PLANE_MIN_DURATION, PLANE_SCALE, PLANE_SPEED,
    TRAIN_LOOKAHEAD, TRAIN_MIN_DURATION, TRAIN_SCALE, TRAIN_SPEED, TRAIN_Y_OFFSET,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle carrying the camera's attention between two landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Plane,
    Train,
}

impl TransportKind {
    pub fn speed(self) -> f32 {
        match self {
            Self::Plane => PLANE_SPEED,
            Self::Train => TRAIN_SPEED,
        }
    }

    pub fn min_duration(self) -> f32 {
        match self {
            Self::Plane => PLANE_MIN_DURATION,
            Self::Train => TRAIN_MIN_DURATION,
        }
    }

    pub fn lookahead(self) -> f32 {
        match self {
            Self::Plane => PLANE_LOOKAHEAD,
            Self::Train => TRAIN_LOOKAHEAD,
        }
    }

    pub fn vehicle_scale(self) -> f32 {
        match self {
            Self::Plane => PLANE_SCALE,
            Self::Train => TRAIN_SCALE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plane => "plane",
            Self::Train => "train",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and facing of a vehicle at one instant of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Vec3,
    /// Rotation about +Y; `None` when the lookahead point coincides with
    /// the position, in which case the previous heading is kept.
    pub yaw: Option<f32>,
}

/// Parametric route between two world positions.
///
/// `t` runs over [0, 1] and is already eased; see [`ease_progress`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportPath {
    kind: TransportKind,
    start: Vec3,
    end: Vec3,
    duration: f32,
}

impl TransportPath {
    pub fn new(kind: TransportKind, start: Vec3, end: Vec3) -> Self {
        let (start, end) = match kind {
            TransportKind::Plane => (start, end),
            TransportKind::Train => (
                start.with_y(TRAIN_Y_OFFSET),
                end.with_y(TRAIN_Y_OFFSET),
            ),
        };
        let duration = (start.distance(end) / kind.speed()).max(kind.min_duration());

        Self {
            kind,
            start,
            end,
            duration,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Seconds the run takes, never below the vehicle's minimum.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn position_at(&self, t: f32) -> Vec3 {
        if t >= 1.0 {
            return self.end;
        }
        let t = t.max(0.0);
        let flat = self.start.lerp(self.end, t);

        match self.kind {
            TransportKind::Plane => {
                let base = self.start.y + (self.end.y - self.start.y) * t;
                let apex = self.start.y.max(self.end.y) + PLANE_ARC_CLEARANCE - base;
                flat.with_y(base + 4.0 * t * (1.0 - t) * apex)
            }
            TransportKind::Train => flat.with_y(TRAIN_Y_OFFSET),
        }
    }

    /// Yaw towards a point `lookahead` units further along the travel
    /// direction. Short routes fall back to facing the end point.
    pub fn heading_from(&self, position: Vec3) -> Option<f32> {
        let travel = (self.end - self.start).with_y(0.0);
        let target = match travel.try_normalize() {
            Some(dir) => position + dir * self.kind.lookahead(),
            None => self.end,
        };
        heading_towards(position, target)
    }

    pub fn sample(&self, t: f32) -> PathSample {
        let position = self.position_at(t);
        PathSample {
            position,
            yaw: self.heading_from(position),
        }
    }
}

/// Slow-fast-slow mapping of linear run progress.
pub fn ease_progress(linear: f32) -> f32 {
    EaseFunction::QuadraticInOut.sample_clamped(linear)
}

/// Yaw (radians about +Y) that turns a model's +Z axis towards `to`,
/// ignoring height difference.
pub fn heading_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let delta = (to - from).with_y(0.0);
    if delta.length_squared() <= 1e-6 {
        return None;
    }
    Some(delta.x.atan2(delta.z))
}
