use bevy::prelude::*;
use constants::transport::{RAIL_DROP, RAIL_SCALE, RAIL_SPACING, TRAIN_Y_OFFSET};

/// Rail piece laid under an active train run.
#[derive(Component)]
pub struct RailSegment;

/// Evenly spaced rail transforms from `start` to `end`, inclusive.
///
/// Spacing is `RAIL_SPACING`; even a short route gets a piece at each end.
/// Pieces face along the route and sit just below the train.
pub fn rail_layout(start: Vec3, end: Vec3) -> Vec<Transform> {
    let from = start.with_y(0.0);
    let to = end.with_y(0.0);
    let length = from.distance(to);
    let count = ((length / RAIL_SPACING).floor() as usize).max(1);
    let rotation = Quat::from_rotation_y((to.x - from.x).atan2(to.z - from.z));
    let height = TRAIN_Y_OFFSET - RAIL_DROP;

    (0..=count)
        .map(|i| {
            let t = i as f32 / count as f32;
            Transform::from_translation(from.lerp(to, t).with_y(height))
                .with_rotation(rotation)
                .with_scale(Vec3::splat(RAIL_SCALE))
        })
        .collect()
}

pub fn spawn_rails(commands: &mut Commands, rail: Handle<Scene>, start: Vec3, end: Vec3) {
    let layout = rail_layout(start, end);
    debug!("Laying {} rail pieces", layout.len());
    for transform in layout {
        commands.spawn((
            SceneRoot(rail.clone()),
            transform,
            RailSegment,
            Name::new("Rail"),
        ));
    }
}

pub fn clear_rails(commands: &mut Commands, rails: &Query<Entity, With<RailSegment>>) {
    for entity in rails.iter() {
        commands.entity(entity).despawn();
    }
}
