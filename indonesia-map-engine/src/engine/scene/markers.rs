use super::picking::MarkerHover;
use super::projection::project_landmark;
use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::landmark::{Landmark, Landmarks};
use crate::engine::assets::model_resources::MarkerModel;
use bevy::prelude::*;
use constants::landmark::{LABEL_FONT_SIZE, LABEL_HEIGHT};
use std::collections::HashSet;

/// Anchor entity for one landmark on the map.
#[derive(Component, Debug, Clone)]
pub struct LandmarkMarker {
    pub landmark_id: String,
    pub display_index: usize,
}

/// Screen-space number label following a marker.
#[derive(Component, Debug, Clone, Copy)]
pub struct MarkerLabel {
    pub marker: Entity,
}

/// Place markers for every landmark that projects onto the current bounds.
///
/// Existing markers move when the bounds are replaced; landmarks without
/// coordinates are skipped.
pub fn sync_markers_to_bounds(
    mut commands: Commands,
    bounds: Res<MapBounds>,
    landmarks: Res<Landmarks>,
    mut markers: Query<(&LandmarkMarker, &mut Transform)>,
) {
    if !bounds.is_changed() && !landmarks.is_changed() {
        return;
    }

    let mut placed = HashSet::new();
    for (marker, mut transform) in markers.iter_mut() {
        placed.insert(marker.landmark_id.clone());
        let Some(landmark) = landmarks.get(&marker.landmark_id) else {
            continue;
        };
        match project_landmark(landmark, Some(&bounds)) {
            Ok(position) => transform.translation = position,
            Err(err) => debug!("{err}"),
        }
    }

    let mut spawned = 0;
    for landmark in landmarks.iter().filter(|l| !placed.contains(&l.id)) {
        match project_landmark(landmark, Some(&bounds)) {
            Ok(position) => {
                spawn_marker(&mut commands, landmark, position);
                spawned += 1;
            }
            Err(err) => debug!("{err}"),
        }
    }
    if spawned > 0 {
        info!("Placed {spawned} landmark markers");
    }
}

fn spawn_marker(commands: &mut Commands, landmark: &Landmark, position: Vec3) {
    let marker = commands
        .spawn((
            LandmarkMarker {
                landmark_id: landmark.id.clone(),
                display_index: landmark.display_index,
            },
            MarkerHover::default(),
            MarkerModel::new(landmark.model_uri.clone(), landmark.scale),
            Transform::from_translation(position),
            Visibility::default(),
            Name::new(format!("Marker:{}", landmark.id)),
        ))
        .id();

    commands.spawn((
        Text::new(landmark.display_index.to_string()),
        TextFont {
            font_size: LABEL_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        MarkerLabel { marker },
    ));
}

/// Keep labels over their markers; hide them behind the camera or while
/// the marker's model is on show.
pub fn position_marker_labels(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    markers: Query<(&GlobalTransform, &MarkerModel, &MarkerHover)>,
    mut labels: Query<(&MarkerLabel, &mut Node, &mut TextColor, &mut Visibility)>,
) {
    let Ok((camera, camera_xf)) = cameras.single() else {
        return;
    };

    for (label, mut node, mut color, mut visibility) in labels.iter_mut() {
        let Ok((marker_xf, model, hover)) = markers.get(label.marker) else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };
        if model.is_shown() {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        }

        let anchor = marker_xf.translation() + Vec3::Y * LABEL_HEIGHT;
        let Ok(screen) = camera.world_to_viewport(camera_xf, anchor) else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        let half = LABEL_FONT_SIZE * 0.5;
        node.left = Val::Px(screen.x - half * 0.6);
        node.top = Val::Px(screen.y - half);
        color.set_if_neq(TextColor(if hover.is_active() {
            Color::srgb(1.0, 0.84, 0.2)
        } else {
            Color::WHITE
        }));
        visibility.set_if_neq(Visibility::Inherited);
    }
}
