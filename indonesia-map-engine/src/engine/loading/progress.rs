use bevy::prelude::*;

/// Startup milestones, reported to the frontend while the app is loading.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub manifest_failed: bool,
    pub vehicles_requested: bool,
    pub base_map_spawned: bool,
    pub base_map_failed: bool,
    pub bounds_ready: bool,
}

impl LoadingProgress {
    /// Share of milestones reached, 0 to 100.
    pub fn percent(&self) -> u8 {
        let steps = [
            self.manifest_loaded,
            self.vehicles_requested,
            self.base_map_spawned,
            self.bounds_ready,
        ];
        let done = steps.iter().filter(|step| **step).count();
        (done * 100 / steps.len()) as u8
    }

    pub fn stage(&self) -> &'static str {
        if self.manifest_failed || self.base_map_failed {
            "failed"
        } else if self.bounds_ready {
            "ready"
        } else if self.base_map_spawned {
            "measuring_map"
        } else if self.manifest_loaded {
            "loading_models"
        } else {
            "loading_manifest"
        }
    }
}
