use crate::engine::error::MapError;
use bevy::prelude::*;
use constants::landmark::{DEFAULT_LANDMARK_SCALE, GENERIC_ISLAND};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Landmark entry as written in the scene manifest.
///
/// Every field besides `id` may be missing; [`Landmark::from_record`] fills
/// in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model_uri: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub z_index: Option<f32>,
    #[serde(default)]
    pub island: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub street_view_url: Option<String>,
}

/// Validated, immutable landmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub id: String,
    pub name: String,
    /// Asset path relative to the asset root; empty when the landmark has no model.
    pub model_uri: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub scale: f32,
    /// Shifts the marker along Z, used to separate landmarks that project to
    /// nearly the same spot.
    pub z_index: f32,
    pub island: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub street_view_url: Option<String>,
    /// 1-based position in the catalogue, shown on the marker label.
    pub display_index: usize,
}

impl Landmark {
    pub fn from_record(
        record: &LandmarkRecord,
        index: usize,
        display_index: usize,
    ) -> Result<Self, MapError> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(MapError::InvalidLandmark {
                index,
                reason: "missing id".to_string(),
            });
        }

        let name = match record.name.trim() {
            "" => id.to_string(),
            name => name.to_string(),
        };

        let scale = record
            .scale
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_LANDMARK_SCALE);

        let island = record
            .island
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: id.to_string(),
            name,
            model_uri: normalize_asset_path(&record.model_uri),
            latitude: record.latitude.filter(|v| v.is_finite()),
            longitude: record.longitude.filter(|v| v.is_finite()),
            scale,
            z_index: record.z_index.filter(|z| z.is_finite()).unwrap_or(0.0),
            island,
            description: record.description.clone(),
            location: record.location.clone(),
            street_view_url: record.street_view_url.clone(),
            display_index,
        })
    }

    pub fn has_model(&self) -> bool {
        !self.model_uri.is_empty()
    }

    /// Island tag usable for train routing; `None` for missing or generic tags.
    pub fn routable_island(&self) -> Option<&str> {
        self.island
            .as_deref()
            .filter(|tag| !tag.eq_ignore_ascii_case(GENERIC_ISLAND))
    }
}

/// Web-style absolute paths ("/model/x.glb") map onto the asset root.
fn normalize_asset_path(uri: &str) -> String {
    uri.trim().trim_start_matches('/').to_string()
}

/// Landmark catalogue built from the manifest, in display order.
#[derive(Resource, Debug, Clone, Default)]
pub struct Landmarks {
    items: Vec<Landmark>,
}

impl Landmarks {
    /// Validate manifest records. Invalid and duplicate entries are skipped
    /// with a warning; display indices count only the kept entries.
    pub fn from_records(records: &[LandmarkRecord]) -> Self {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match Landmark::from_record(record, index, items.len() + 1) {
                Ok(landmark) => {
                    if !seen.insert(landmark.id.clone()) {
                        warn!(
                            "{}",
                            MapError::InvalidLandmark {
                                index,
                                reason: format!("duplicate id '{}'", landmark.id),
                            }
                        );
                        continue;
                    }
                    items.push(landmark);
                }
                Err(err) => warn!("{err}"),
            }
        }

        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&Landmark> {
        self.items.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
