use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::model_resources::{LoadPoll, poll_load};
use crate::engine::error::MapError;
use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use constants::coordinate_system::{BASE_MAP_ROTATION_X, BASE_MAP_SCALE};

#[derive(Component)]
pub struct BaseMap;

/// The spawned base map and whether its bounds need measuring.
#[derive(Resource, Debug)]
pub struct BaseMapScene {
    pub uri: String,
    pub handle: Handle<Scene>,
    pub entity: Entity,
    pub bounds_dirty: bool,
    /// Set on reload until the scene spawner has swapped in the new meshes.
    pub awaiting_respawn: bool,
}

impl BaseMapScene {
    pub fn new(uri: impl Into<String>, handle: Handle<Scene>, entity: Entity) -> Self {
        Self {
            uri: uri.into(),
            handle,
            entity,
            bounds_dirty: true,
            awaiting_respawn: false,
        }
    }
}

pub fn spawn_base_map(commands: &mut Commands, asset_server: &AssetServer, uri: &str) {
    let path = uri.trim_start_matches('/').to_string();
    info!("Loading base map: {path}");
    let handle: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));

    let entity = commands
        .spawn((
            SceneRoot(handle.clone()),
            Transform::from_rotation(Quat::from_rotation_x(BASE_MAP_ROTATION_X))
                .with_scale(Vec3::splat(BASE_MAP_SCALE)),
            BaseMap,
            Name::new("BaseMap"),
        ))
        .id();

    commands.insert_resource(BaseMapScene::new(path, handle, entity));
}

/// Measure the base map once every mesh under it has a bounding box.
pub fn compute_map_bounds(
    mut commands: Commands,
    base_map: Option<ResMut<BaseMapScene>>,
    mut progress: ResMut<LoadingProgress>,
    children: Query<&Children>,
    meshes: Query<(&GlobalTransform, Option<&Aabb>, Ref<Mesh3d>)>,
) {
    let Some(mut base_map) = base_map else {
        return;
    };
    if !base_map.bounds_dirty {
        return;
    }

    if base_map.awaiting_respawn {
        let respawned = children
            .iter_descendants(base_map.entity)
            .filter_map(|entity| meshes.get(entity).ok())
            .any(|(_, _, mesh)| mesh.is_changed());
        if !respawned {
            return;
        }
        base_map.awaiting_respawn = false;
    }

    let mut boxes = Vec::new();
    for entity in children.iter_descendants(base_map.entity) {
        match meshes.get(entity) {
            Ok((global, Some(aabb), _)) => boxes.push((global.affine(), *aabb)),
            // Mesh asset not ready yet
            Ok((_, None, _)) => return,
            Err(_) => {}
        }
    }

    let Some(bounds) = MapBounds::from_mesh_boxes(boxes) else {
        return;
    };
    info!(
        "Map bounds ready: min {:?}, max {:?}",
        bounds.min, bounds.max
    );
    commands.insert_resource(bounds);
    base_map.bounds_dirty = false;
    progress.bounds_ready = true;
}

/// A hot-reloaded base map gets measured again once its new instance exists.
pub fn watch_base_map_reload(
    mut events: EventReader<AssetEvent<Scene>>,
    base_map: Option<ResMut<BaseMapScene>>,
) {
    let Some(mut base_map) = base_map else {
        return;
    };
    for event in events.read() {
        if event.is_modified(&base_map.handle) {
            info!("Base map changed on disk, recomputing bounds");
            base_map.bounds_dirty = true;
            base_map.awaiting_respawn = true;
        }
    }
}

/// Report a base map that will never load; the app then stays in `Loading`.
pub fn watch_base_map_load(
    asset_server: Res<AssetServer>,
    base_map: Option<Res<BaseMapScene>>,
    mut progress: ResMut<LoadingProgress>,
) {
    if progress.base_map_failed || progress.bounds_ready {
        return;
    }
    let Some(base_map) = base_map else {
        return;
    };
    if let LoadPoll::Failed(reason) = poll_load(&asset_server, &base_map.handle) {
        error!(
            "{}",
            MapError::AssetLoad {
                uri: base_map.uri.clone(),
                reason,
            }
        );
        progress.base_map_failed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spawn_mesh(app: &mut App, parent: Entity, at: Vec3, aabb: Option<Aabb>) -> Entity {
        let world = app.world_mut();
        let mut mesh = world.spawn((
            Mesh3d(Handle::default()),
            GlobalTransform::from_translation(at),
        ));
        if let Some(aabb) = aabb {
            mesh.insert(aabb);
        }
        let mesh = mesh.id();
        world.entity_mut(parent).add_child(mesh);
        mesh
    }

    fn bounds_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<LoadingProgress>()
            .add_event::<AssetEvent<Scene>>()
            .add_systems(Update, (watch_base_map_reload, compute_map_bounds).chain());
        let root = app.world_mut().spawn_empty().id();
        app.insert_resource(BaseMapScene::new("map/base.glb", Handle::default(), root));
        (app, root)
    }

    #[test]
    fn bounds_wait_for_every_mesh() {
        let (mut app, root) = bounds_app();
        let unit = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));
        spawn_mesh(&mut app, root, Vec3::ZERO, Some(unit));
        let late = spawn_mesh(&mut app, root, Vec3::new(10.0, 0.0, 0.0), None);

        app.update();
        assert!(app.world().get_resource::<MapBounds>().is_none());

        app.world_mut().entity_mut(late).insert(unit);
        app.update();

        let bounds = *app.world().resource::<MapBounds>();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
        assert!(app.world().resource::<LoadingProgress>().bounds_ready);
        assert!(!app.world().resource::<BaseMapScene>().bounds_dirty);
    }

    #[test]
    fn reloaded_map_is_measured_after_its_meshes_are_replaced() {
        let (mut app, root) = bounds_app();
        let unit = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));
        let old = spawn_mesh(&mut app, root, Vec3::ZERO, Some(unit));
        app.update();
        assert_eq!(app.world().resource::<MapBounds>().max, Vec3::ONE);

        let id = app.world().resource::<BaseMapScene>().handle.id();
        app.world_mut().send_event(AssetEvent::<Scene>::Modified { id });
        app.update();

        // Old instance is still attached this frame.
        assert_eq!(app.world().resource::<MapBounds>().max, Vec3::ONE);
        assert!(app.world().resource::<BaseMapScene>().bounds_dirty);

        app.world_mut().entity_mut(old).despawn();
        let wide = Aabb::from_min_max(Vec3::new(-4.0, 0.0, -2.0), Vec3::new(4.0, 1.0, 2.0));
        spawn_mesh(&mut app, root, Vec3::new(1.0, 0.0, 0.0), Some(wide));
        app.update();

        let bounds = *app.world().resource::<MapBounds>();
        assert_eq!(bounds.min, Vec3::new(-3.0, 0.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(5.0, 1.0, 2.0));
        let scene = app.world().resource::<BaseMapScene>();
        assert!(!scene.bounds_dirty);
        assert!(!scene.awaiting_respawn);
    }

    #[test]
    fn missing_base_map_marks_loading_failed() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Scene>()
            .init_resource::<LoadingProgress>()
            .add_systems(Update, watch_base_map_load);

        // No loader is registered for .glb here, so the load can only fail.
        let handle = app
            .world()
            .resource::<AssetServer>()
            .load::<Scene>("map/missing.glb");
        let root = app.world_mut().spawn_empty().id();
        app.insert_resource(BaseMapScene::new("map/missing.glb", handle, root));

        for _ in 0..200 {
            app.update();
            if app.world().resource::<LoadingProgress>().base_map_failed {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        let progress = app.world().resource::<LoadingProgress>();
        assert!(progress.base_map_failed);
        assert_eq!(progress.stage(), "failed");
    }
}
