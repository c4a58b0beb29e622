use super::markers::LandmarkMarker;
use super::ray::ray_hits_obb;
use crate::engine::flight::events::{ExternalHover, HoverChanged, LandmarkSelected};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::landmark::{HITBOX_DEPTH, HITBOX_HEIGHT, HITBOX_WIDTH, LABEL_HEIGHT};

/// Hover sources for one marker. Either one shows the model preview.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerHover {
    pub pointer: bool,
    pub external: bool,
}

impl MarkerHover {
    pub fn is_active(&self) -> bool {
        self.pointer || self.external
    }
}

/// Marker currently under the cursor.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerHover {
    pub marker: Option<Entity>,
}

/// Pick the marker whose camera-facing hit card the ray crosses.
///
/// Cards can overlap on screen; the one hit closest to its own centre wins,
/// not the nearest one.
pub fn pick_marker<I>(origin: Vec3, dir: Vec3, facing: Quat, anchors: I) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, Vec3)>,
{
    let size = Vec3::new(HITBOX_WIDTH, HITBOX_HEIGHT, HITBOX_DEPTH);
    let mut best: Option<(Entity, f32)> = None;

    for (entity, anchor) in anchors {
        let center = anchor + Vec3::Y * LABEL_HEIGHT;
        let card = GlobalTransform::from(Transform::from_translation(center).with_rotation(facing));
        let Some(t) = ray_hits_obb(origin, dir, &card, size) else {
            continue;
        };
        let offset = (origin + dir * t).distance(center);
        if best.is_none_or(|(_, score)| offset < score) {
            best = Some((entity, offset));
        }
    }

    best.map(|(entity, _)| entity)
}

pub fn update_pointer_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    markers: Query<(Entity, &GlobalTransform, &LandmarkMarker)>,
    mut pointer: ResMut<PointerHover>,
    mut hover_events: EventWriter<HoverChanged>,
) {
    let hovered = (|| {
        let cursor = windows.single().ok()?.cursor_position()?;
        let (camera, camera_xf) = cameras.single().ok()?;
        let ray = camera.viewport_to_world(camera_xf, cursor).ok()?;
        pick_marker(
            ray.origin,
            ray.direction.as_vec3(),
            camera_xf.rotation(),
            markers.iter().map(|(e, xf, _)| (e, xf.translation())),
        )
    })();

    if pointer.set_if_neq(PointerHover { marker: hovered }) {
        let landmark_id = hovered
            .and_then(|e| markers.get(e).ok())
            .map(|(_, _, marker)| marker.landmark_id.clone());
        hover_events.write(HoverChanged { landmark_id });
    }
}

/// Merge pointer and external hover into each marker's hover state.
pub fn apply_marker_hover(
    pointer: Res<PointerHover>,
    external: Res<ExternalHover>,
    mut markers: Query<(Entity, &LandmarkMarker, &mut MarkerHover)>,
) {
    for (entity, marker, mut hover) in markers.iter_mut() {
        hover.set_if_neq(MarkerHover {
            pointer: pointer.marker == Some(entity),
            external: external.landmark_id.as_deref() == Some(marker.landmark_id.as_str()),
        });
    }
}

pub fn select_marker_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    pointer: Res<PointerHover>,
    markers: Query<(&LandmarkMarker, &GlobalTransform)>,
    mut selected: EventWriter<LandmarkSelected>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some((marker, xf)) = pointer.marker.and_then(|e| markers.get(e).ok()) else {
        return;
    };
    selected.write(LandmarkSelected {
        landmark_id: marker.landmark_id.clone(),
        world_pos: Some(xf.translation()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: u32) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn card_hit_closest_to_its_centre_wins() {
        let e = entities(2);
        let origin = Vec3::new(0.1, LABEL_HEIGHT, 10.0);
        let anchors = [(e[0], Vec3::ZERO), (e[1], Vec3::new(0.1, 0.0, -1.0))];

        let picked = pick_marker(origin, Vec3::NEG_Z, Quat::IDENTITY, anchors);
        assert_eq!(picked, Some(e[1]));
    }

    #[test]
    fn ray_beside_every_card_picks_nothing() {
        let e = entities(1);
        let origin = Vec3::new(0.5, LABEL_HEIGHT, 10.0);
        assert_eq!(
            pick_marker(origin, Vec3::NEG_Z, Quat::IDENTITY, [(e[0], Vec3::ZERO)]),
            None
        );
    }

    #[test]
    fn card_is_taller_than_wide() {
        let e = entities(1);
        let above = Vec3::new(0.0, LABEL_HEIGHT + 0.35, 10.0);
        let aside = Vec3::new(0.2, LABEL_HEIGHT, 10.0);
        let anchors = [(e[0], Vec3::ZERO)];
        assert!(pick_marker(above, Vec3::NEG_Z, Quat::IDENTITY, anchors).is_some());
        assert!(pick_marker(aside, Vec3::NEG_Z, Quat::IDENTITY, anchors).is_none());
    }

    #[test]
    fn external_hover_marks_only_its_marker() {
        let mut app = App::new();
        app.init_resource::<PointerHover>()
            .insert_resource(ExternalHover {
                landmark_id: Some("candi-prambanan".to_string()),
            })
            .add_systems(Update, apply_marker_hover);
        let spawn = |app: &mut App, id: &str| {
            app.world_mut()
                .spawn((
                    LandmarkMarker {
                        landmark_id: id.to_string(),
                        display_index: 1,
                    },
                    MarkerHover::default(),
                ))
                .id()
        };
        let monas = spawn(&mut app, "monas-jakarta");
        let prambanan = spawn(&mut app, "candi-prambanan");
        app.update();

        assert!(!app.world().get::<MarkerHover>(monas).unwrap().is_active());
        let hover = app.world().get::<MarkerHover>(prambanan).unwrap();
        assert!(hover.external && !hover.pointer);
    }
}
