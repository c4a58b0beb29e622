use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::constants::ui::{AMBIENT_BRIGHTNESS, CLEAR_COLOR};
use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::scene_manifest::MapManifest;
use crate::engine::camera::viewport_camera::{
    ViewportCamera, camera_controller, focus_on_map_bounds,
};
use crate::engine::core::app_state::{
    AppState, FpsText, StatusText, transition_to_running, update_loading_frontend,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::flight::FlightPlugin;
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::MapScenePlugin;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::transport::TransportPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use constants::camera::{CAMERA_FOV_DEGREES, INITIAL_CAMERA_POSITION};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    flight_status::status_text_update_system, fps_tracking::fps_text_update_system,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers MapManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<MapManifest>::new(&["json"]))
        .add_plugins(FlightPlugin)
        .add_plugins(TransportPlugin)
        .add_plugins(MapScenePlugin)
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(CLEAR_COLOR))
        .insert_resource(AmbientLight {
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        });

    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .insert_resource(ViewportCamera::from_eye(INITIAL_CAMERA_POSITION, Vec3::ZERO));

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (load_manifest_system, transition_to_running, update_loading_frontend)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            focus_on_map_bounds.run_if(resource_exists_and_changed::<MapBounds>),
        );

    let runtime_systems = (camera_controller, fps_notification_system);
    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, (fps_text_update_system, status_text_update_system));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        Transform::from_translation(INITIAL_CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    let font = TextFont {
        font_size: crate::constants::ui::OVERLAY_FONT_SIZE,
        ..default()
    };

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                font.clone(),
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new("Loading map..."),
                font,
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
