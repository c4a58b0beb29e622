use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::MANIFEST_PATH;
use crate::engine::assets::landmark::Landmarks;
use crate::engine::assets::scene_manifest::MapManifest;
use crate::engine::error::MapError;
use crate::engine::flight::coordinator::{ExclusionRule, FlightCoordinator};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::base_map::spawn_base_map;
use crate::engine::transport::animator::TransportSettings;
use crate::engine::transport::vehicles::{TransportModels, spawn_vehicles};

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<MapManifest>>,
}

impl ManifestLoader {
    pub fn handle(&self) -> Option<&Handle<MapManifest>> {
        self.handle.as_ref()
    }
}

pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading map manifest from {MANIFEST_PATH}");
    manifest_loader.handle = Some(asset_server.load(MANIFEST_PATH));
}

/// Once the manifest is parsed, publish the catalogue and options, request
/// the vehicle models and spawn the base map.
pub fn load_manifest_system(
    mut commands: Commands,
    mut progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<MapManifest>>,
    asset_server: Res<AssetServer>,
    mut coordinator: ResMut<FlightCoordinator>,
    mut settings: ResMut<TransportSettings>,
) {
    if progress.manifest_loaded || progress.manifest_failed {
        return;
    }
    let Some(handle) = manifest_loader.handle() else {
        return;
    };

    let Some(manifest) = manifests.get(handle) else {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
            error!(
                "{}",
                MapError::AssetLoad {
                    uri: MANIFEST_PATH.to_string(),
                    reason: err.to_string(),
                }
            );
            progress.manifest_failed = true;
        }
        return;
    };

    let landmarks = Landmarks::from_records(&manifest.landmarks);
    info!(
        "Manifest loaded: {} of {} landmarks usable",
        landmarks.len(),
        manifest.landmarks.len()
    );
    if landmarks.is_empty() {
        warn!("Manifest has no usable landmarks, the map will show no markers");
    }

    coordinator.set_exclusion(ExclusionRule::new(
        manifest.excluded_model_patterns.iter().cloned(),
    ));
    settings.rails_enabled = manifest.rails_enabled;

    let models = TransportModels::load(&asset_server, &manifest.vehicles);
    spawn_vehicles(&mut commands, &models);
    commands.insert_resource(models);
    progress.vehicles_requested = true;

    spawn_base_map(&mut commands, &asset_server, &manifest.base_map);
    progress.base_map_spawned = true;

    commands.insert_resource(landmarks);
    commands.insert_resource(manifest.clone());
    progress.manifest_loaded = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::base_map::BaseMapScene;
    use crate::engine::transport::vehicles::TransportVehicle;

    fn manifest() -> MapManifest {
        serde_json::from_str(include_str!("../../../assets/data/map_manifest.json")).unwrap()
    }

    fn app_with_manifest() -> (App, Handle<MapManifest>) {
        app_with(manifest())
    }

    fn app_with(manifest: MapManifest) -> (App, Handle<MapManifest>) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<MapManifest>()
            .init_asset::<Scene>()
            .init_resource::<LoadingProgress>()
            .init_resource::<FlightCoordinator>()
            .init_resource::<TransportSettings>()
            .add_systems(Update, load_manifest_system);

        let handle = app
            .world_mut()
            .resource_mut::<Assets<MapManifest>>()
            .add(manifest);
        app.insert_resource(ManifestLoader {
            handle: Some(handle.clone()),
        });
        (app, handle)
    }

    #[test]
    fn loaded_manifest_populates_scene() {
        let (mut app, _handle) = app_with_manifest();
        app.update();

        let world = app.world_mut();
        let progress = world.resource::<LoadingProgress>().clone();
        assert!(progress.manifest_loaded);
        assert!(progress.vehicles_requested);
        assert!(progress.base_map_spawned);
        assert!(!progress.bounds_ready);

        assert!(world.resource::<Landmarks>().get("monas-jakarta").is_some());
        assert!(world.get_resource::<TransportModels>().is_some());
        assert!(world.get_resource::<BaseMapScene>().is_some());

        let vehicles = world
            .query::<&TransportVehicle>()
            .iter(world)
            .count();
        assert_eq!(vehicles, 2);
    }

    #[test]
    fn manifest_is_applied_once() {
        let (mut app, _handle) = app_with_manifest();
        app.update();
        app.update();

        let world = app.world_mut();
        let vehicles = world.query::<&TransportVehicle>().iter(world).count();
        assert_eq!(vehicles, 2);
    }

    #[test]
    fn empty_catalogue_still_finishes_loading() {
        let mut empty = manifest();
        empty.landmarks.clear();
        let (mut app, _handle) = app_with(empty);
        app.update();

        assert!(app.world().resource::<LoadingProgress>().manifest_loaded);
        assert!(app.world().resource::<Landmarks>().is_empty());
        assert!(app.world().get_resource::<BaseMapScene>().is_some());
    }

    #[test]
    fn nothing_happens_before_loading_starts() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<MapManifest>()
            .init_resource::<ManifestLoader>()
            .init_resource::<LoadingProgress>()
            .init_resource::<FlightCoordinator>()
            .init_resource::<TransportSettings>()
            .add_systems(Update, load_manifest_system);
        app.update();

        assert_eq!(
            *app.world().resource::<LoadingProgress>(),
            LoadingProgress::default()
        );
    }
}
