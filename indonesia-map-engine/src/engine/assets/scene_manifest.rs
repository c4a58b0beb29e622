use super::landmark::LandmarkRecord;
use bevy::prelude::*;
use constants::landmark::DEFAULT_EXCLUDED_MODEL_PATTERNS;
use serde::{Deserialize, Serialize};

/// Glb paths for the transport vehicles and rail piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleModels {
    pub plane: String,
    pub train: String,
    #[serde(default)]
    pub rail: Option<String>,
}

/// Runtime scene description loaded from `data/map_manifest.json`.
///
/// Holds the base map, vehicle models, flight options and the landmark
/// catalogue. Kept as a resource after loading so other systems can read
/// the options without touching the asset store.
#[derive(Asset, Resource, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct MapManifest {
    pub base_map: String,
    pub vehicles: VehicleModels,
    #[serde(default)]
    pub home_landmark_id: Option<String>,
    #[serde(default)]
    pub rails_enabled: bool,
    #[serde(default = "default_excluded_patterns")]
    pub excluded_model_patterns: Vec<String>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkRecord>,
}

fn default_excluded_patterns() -> Vec<String> {
    DEFAULT_EXCLUDED_MODEL_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_default() {
        let json = r#"{
            "base_map": "model/indonesia.glb",
            "vehicles": { "plane": "model/plane.glb", "train": "model/train.glb" }
        }"#;
        let manifest: MapManifest = serde_json::from_str(json).unwrap();

        assert!(!manifest.rails_enabled);
        assert!(manifest.home_landmark_id.is_none());
        assert!(manifest.vehicles.rail.is_none());
        assert_eq!(manifest.excluded_model_patterns, ["placeholder"]);
        assert!(manifest.landmarks.is_empty());
    }

    #[test]
    fn bundled_manifest_parses() {
        let json = include_str!("../../../assets/data/map_manifest.json");
        let manifest: MapManifest = serde_json::from_str(json).unwrap();

        assert!(!manifest.landmarks.is_empty());
        let home = manifest.home_landmark_id.as_deref().unwrap();
        assert!(manifest.landmarks.iter().any(|l| l.id == home));
    }
}
