use super::path::TransportKind;
use crate::engine::assets::scene_manifest::VehicleModels;
use crate::engine::error::MapError;
use bevy::prelude::*;
use constants::transport::VEHICLE_PARK_POSITION;

/// Scene handles for the vehicles and rail piece, loaded with the manifest.
#[derive(Resource, Debug, Clone)]
pub struct TransportModels {
    pub plane: Handle<Scene>,
    pub train: Handle<Scene>,
    pub rail: Option<Handle<Scene>>,
}

impl TransportModels {
    pub fn load(asset_server: &AssetServer, models: &VehicleModels) -> Self {
        let scene = |path: &str| -> Handle<Scene> {
            let path = path.trim_start_matches('/').to_string();
            asset_server.load(GltfAssetLabel::Scene(0).from_asset(path))
        };
        info!(
            "Loading vehicle models: plane={}, train={}",
            models.plane, models.train
        );
        Self {
            plane: scene(&models.plane),
            train: scene(&models.train),
            rail: models.rail.as_deref().map(scene),
        }
    }

    pub fn handle(&self, kind: TransportKind) -> &Handle<Scene> {
        match kind {
            TransportKind::Plane => &self.plane,
            TransportKind::Train => &self.train,
        }
    }
}

/// Fails with `AnimatorNotReady` until the vehicle scene and its
/// dependencies are loaded.
pub fn ensure_vehicle_ready(
    asset_server: &AssetServer,
    models: Option<&TransportModels>,
    kind: TransportKind,
) -> Result<(), MapError> {
    match models {
        Some(models) if asset_server.is_loaded_with_dependencies(models.handle(kind)) => Ok(()),
        _ => Err(MapError::AnimatorNotReady { kind }),
    }
}

/// Marks the entity showing one vehicle kind.
#[derive(Component, Debug, Clone, Copy)]
pub struct TransportVehicle {
    pub kind: TransportKind,
}

/// Spawn one hidden, parked entity per vehicle kind.
///
/// The glTF's embedded animations are never started, so vehicles stay static.
pub fn spawn_vehicles(commands: &mut Commands, models: &TransportModels) {
    for kind in [TransportKind::Plane, TransportKind::Train] {
        commands.spawn((
            SceneRoot(models.handle(kind).clone()),
            Transform::from_translation(VEHICLE_PARK_POSITION)
                .with_scale(Vec3::splat(kind.vehicle_scale())),
            Visibility::Hidden,
            TransportVehicle { kind },
            Name::new(format!("Vehicle:{kind}")),
        ));
    }
}
