use super::path::{PathSample, TransportKind, TransportPath, ease_progress};
use bevy::prelude::*;

/// One fly-to animation in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRun {
    path: TransportPath,
    landmark_id: String,
    target: Vec3,
    elapsed: f32,
    progress: f32,
}

/// Outcome of advancing a run by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStep {
    pub sample: PathSample,
    pub finished: bool,
}

impl TransportRun {
    pub fn new(path: TransportPath, landmark_id: impl Into<String>, target: Vec3) -> Self {
        Self {
            path,
            landmark_id: landmark_id.into(),
            target,
            elapsed: 0.0,
            progress: 0.0,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.path.kind()
    }

    pub fn path(&self) -> &TransportPath {
        &self.path
    }

    pub fn landmark_id(&self) -> &str {
        &self.landmark_id
    }

    /// Position reported on completion. For trains this keeps the marker's
    /// height rather than the ground-level path end.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn advance(&mut self, dt: f32) -> RunStep {
        self.elapsed += dt.max(0.0);
        let duration = self.path.duration();
        let linear = if duration > 0.0 {
            (self.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        let finished = linear >= 1.0;

        self.progress = if finished {
            1.0
        } else {
            self.progress.max(ease_progress(linear))
        };

        RunStep {
            sample: self.path.sample(self.progress),
            finished,
        }
    }
}

/// The single active transport animation.
///
/// A plane and a train can never run at the same time; starting a new run
/// replaces whatever was playing.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum TransportJob {
    #[default]
    None,
    Plane(TransportRun),
    Train(TransportRun),
}

impl TransportJob {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn kind(&self) -> Option<TransportKind> {
        self.active().map(TransportRun::kind)
    }

    pub fn active(&self) -> Option<&TransportRun> {
        match self {
            Self::None => None,
            Self::Plane(run) | Self::Train(run) => Some(run),
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut TransportRun> {
        match self {
            Self::None => None,
            Self::Plane(run) | Self::Train(run) => Some(run),
        }
    }

    /// Install `run`, returning the run it displaced.
    pub fn start(&mut self, run: TransportRun) -> Option<TransportRun> {
        let next = match run.kind() {
            TransportKind::Plane => Self::Plane(run),
            TransportKind::Train => Self::Train(run),
        };
        std::mem::replace(self, next).into_run()
    }

    /// Stop the active run without completing it.
    pub fn kill(&mut self) -> Option<TransportRun> {
        std::mem::take(self).into_run()
    }

    fn into_run(self) -> Option<TransportRun> {
        match self {
            Self::None => None,
            Self::Plane(run) | Self::Train(run) => Some(run),
        }
    }
}
