use super::bounds::union_of_boxes;
use crate::engine::error::MapError;
use crate::engine::scene::markers::LandmarkMarker;
use crate::engine::scene::picking::MarkerHover;
use crate::engine::scene::tween::{ScaleTween, Spin, TweenFinish};
use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use constants::landmark::COLLAPSED_MODEL_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Shown,
    /// Shrinking out before disposal.
    Releasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    StartLoad,
    /// Cancel a running shrink and grow back from the current scale.
    Regrow,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    Shrink,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResolution {
    Attach,
    /// Nobody wants the model any more; drop it without showing it.
    Discard,
}

/// Per-marker model state, independent of the ECS so it can be reasoned
/// about (and tested) on its own.
///
/// `interested` tracks hover; the phase tracks the resource. A load that
/// resolves after interest was lost is discarded rather than attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelLifecycle {
    phase: LoadPhase,
    interested: bool,
}

impl ModelLifecycle {
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_interested(&self) -> bool {
        self.interested
    }

    pub fn request(&mut self) -> RequestAction {
        self.interested = true;
        match self.phase {
            LoadPhase::Idle => {
                self.phase = LoadPhase::Loading;
                RequestAction::StartLoad
            }
            LoadPhase::Releasing => {
                self.phase = LoadPhase::Shown;
                RequestAction::Regrow
            }
            LoadPhase::Loading | LoadPhase::Shown => RequestAction::Nothing,
        }
    }

    pub fn release(&mut self) -> ReleaseAction {
        self.interested = false;
        match self.phase {
            LoadPhase::Shown => {
                self.phase = LoadPhase::Releasing;
                ReleaseAction::Shrink
            }
            _ => ReleaseAction::Nothing,
        }
    }

    pub fn resolve_loaded(&mut self) -> LoadResolution {
        if self.phase == LoadPhase::Loading && self.interested {
            self.phase = LoadPhase::Shown;
            LoadResolution::Attach
        } else {
            if self.phase == LoadPhase::Loading {
                self.phase = LoadPhase::Idle;
            }
            LoadResolution::Discard
        }
    }

    /// A failed load leaves the marker label-only until it is hovered again.
    pub fn resolve_failed(&mut self) {
        if self.phase == LoadPhase::Loading {
            self.phase = LoadPhase::Idle;
        }
    }

    /// True when the shrink-out finished and the model should be disposed.
    pub fn finish_release(&mut self) -> bool {
        if self.phase == LoadPhase::Releasing {
            self.phase = LoadPhase::Idle;
            true
        } else {
            false
        }
    }
}

/// Lazily loaded hover preview attached to a landmark marker.
#[derive(Component, Debug, Clone, Default)]
pub struct MarkerModel {
    pub uri: String,
    pub scale: f32,
    lifecycle: ModelLifecycle,
    pending: Option<Handle<Scene>>,
    scene: Option<Handle<Scene>>,
    holder: Option<Entity>,
}

impl MarkerModel {
    pub fn new(uri: impl Into<String>, scale: f32) -> Self {
        Self {
            uri: uri.into(),
            scale,
            ..default()
        }
    }

    pub fn lifecycle(&self) -> ModelLifecycle {
        self.lifecycle
    }

    /// The model is on screen (growing, spinning or shrinking).
    pub fn is_shown(&self) -> bool {
        self.holder.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Scales and spins the model; parent of the glTF scene root.
#[derive(Component, Debug, Clone, Copy)]
pub struct ModelHolder {
    pub marker: Entity,
}

/// Scene root waiting for its meshes to get bounds before being shown.
#[derive(Component)]
pub struct PendingRecenter;

/// Running totals of model resources, for diagnostics.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResourceStats {
    pub requested: usize,
    pub attached: usize,
    pub discarded: usize,
    pub failed: usize,
    pub disposed: usize,
}

impl ModelResourceStats {
    /// Models currently holding scene instances.
    pub fn live(&self) -> usize {
        self.attached.saturating_sub(self.disposed)
    }
}

/// Start loads on hover, shrink out on un-hover.
pub fn drive_model_requests(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut stats: ResMut<ModelResourceStats>,
    mut markers: Query<(&LandmarkMarker, &MarkerHover, &mut MarkerModel), Changed<MarkerHover>>,
    holders: Query<&Transform, With<ModelHolder>>,
) {
    for (marker, hover, mut model) in markers.iter_mut() {
        if model.uri.is_empty() {
            continue;
        }
        let current_scale = model
            .holder
            .and_then(|holder| holders.get(holder).ok())
            .map_or(COLLAPSED_MODEL_SCALE, |t| t.scale.x);

        if hover.is_active() {
            match model.lifecycle.request() {
                RequestAction::StartLoad => {
                    debug!("Loading model for '{}': {}", marker.landmark_id, model.uri);
                    let path = GltfAssetLabel::Scene(0).from_asset(model.uri.clone());
                    model.pending = Some(asset_server.load(path));
                    stats.requested += 1;
                }
                RequestAction::Regrow => {
                    if let Some(holder) = model.holder {
                        commands
                            .entity(holder)
                            .insert((ScaleTween::grow(current_scale, model.scale), Spin::default()));
                    }
                }
                RequestAction::Nothing => {}
            }
        } else if model.lifecycle.release() == ReleaseAction::Shrink {
            if let Some(holder) = model.holder {
                commands
                    .entity(holder)
                    .remove::<Spin>()
                    .insert(ScaleTween::shrink(current_scale));
            }
        }
    }
}

pub(crate) enum LoadPoll {
    Pending,
    Ready,
    Failed(String),
}

pub(crate) fn poll_load(asset_server: &AssetServer, handle: &Handle<Scene>) -> LoadPoll {
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        return LoadPoll::Failed(err.to_string());
    }
    if let Some(RecursiveDependencyLoadState::Failed(err)) =
        asset_server.get_recursive_dependency_load_state(handle)
    {
        return LoadPoll::Failed(err.to_string());
    }
    if asset_server.is_loaded_with_dependencies(handle) {
        LoadPoll::Ready
    } else {
        LoadPoll::Pending
    }
}

/// Attach finished loads that are still wanted, discard the rest.
pub fn resolve_model_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut stats: ResMut<ModelResourceStats>,
    mut markers: Query<(Entity, &mut MarkerModel)>,
) {
    for (marker, mut model) in markers.iter_mut() {
        let Some(handle) = model.pending.as_ref() else {
            continue;
        };

        match poll_load(&asset_server, handle) {
            LoadPoll::Pending => {}
            LoadPoll::Failed(reason) => {
                model.pending = None;
                model.lifecycle.resolve_failed();
                stats.failed += 1;
                let err = MapError::AssetLoad {
                    uri: model.uri.clone(),
                    reason,
                };
                warn!("{err}");
            }
            LoadPoll::Ready => {
                let Some(handle) = model.pending.take() else {
                    continue;
                };
                match model.lifecycle.resolve_loaded() {
                    LoadResolution::Attach => {
                        let holder = spawn_model_holder(&mut commands, marker, &handle, model.scale);
                        model.holder = Some(holder);
                        model.scene = Some(handle);
                        stats.attached += 1;
                    }
                    LoadResolution::Discard => {
                        debug!("{}", MapError::StaleResource { uri: model.uri.clone() });
                        stats.discarded += 1;
                    }
                }
            }
        }
    }
}

fn spawn_model_holder(
    commands: &mut Commands,
    marker: Entity,
    scene: &Handle<Scene>,
    scale: f32,
) -> Entity {
    let holder = commands
        .spawn((
            ModelHolder { marker },
            Transform::from_scale(Vec3::splat(COLLAPSED_MODEL_SCALE)),
            Visibility::default(),
            ScaleTween::grow(COLLAPSED_MODEL_SCALE, scale),
            Spin::default(),
            Name::new("MarkerModel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                SceneRoot(scene.clone()),
                Transform::default(),
                Visibility::Hidden,
                PendingRecenter,
            ));
        })
        .id();
    commands.entity(marker).add_child(holder);
    holder
}

/// Offset placing a model's box centre on the origin with its base at y = 0.
pub fn recentre_offset(min: Vec3, max: Vec3) -> Vec3 {
    let center = (min + max) * 0.5;
    Vec3::new(-center.x, -min.y, -center.z)
}

/// Centre freshly spawned model scenes on their marker and reveal them.
pub fn recenter_loaded_models(
    mut commands: Commands,
    mut roots: Query<
        (Entity, &GlobalTransform, &mut Transform, &mut Visibility),
        With<PendingRecenter>,
    >,
    children: Query<&Children>,
    meshes: Query<(&GlobalTransform, Option<&Aabb>), With<Mesh3d>>,
) {
    for (root, root_global, mut transform, mut visibility) in roots.iter_mut() {
        let to_local = root_global.affine().inverse();
        let mut boxes = Vec::new();
        let mut waiting = false;

        for entity in children.iter_descendants(root) {
            match meshes.get(entity) {
                Ok((global, Some(aabb))) => boxes.push((to_local * global.affine(), *aabb)),
                Ok((_, None)) => waiting = true,
                Err(_) => {}
            }
        }
        if waiting {
            continue;
        }
        // Scene not instanced yet.
        let Some((min, max)) = union_of_boxes(boxes) else {
            continue;
        };

        transform.translation = recentre_offset(min, max);
        *visibility = Visibility::Inherited;
        commands.entity(root).remove::<PendingRecenter>();
    }
}

/// Dispose models whose shrink-out has finished.
pub fn finish_model_releases(
    mut commands: Commands,
    mut stats: ResMut<ModelResourceStats>,
    holders: Query<(Entity, &ModelHolder, &ScaleTween)>,
    mut models: Query<&mut MarkerModel>,
) {
    for (holder, owner, tween) in holders.iter() {
        if !tween.finished() || tween.on_finish != TweenFinish::Release {
            continue;
        }
        let Ok(mut model) = models.get_mut(owner.marker) else {
            commands.entity(holder).despawn();
            continue;
        };
        if model.lifecycle.finish_release() {
            dispose_model(&mut commands, &mut model, &mut stats);
        } else {
            commands.entity(holder).remove::<ScaleTween>();
        }
    }
}

/// Stop the model's tweens, then drop its scene instance and asset handle.
fn dispose_model(commands: &mut Commands, model: &mut MarkerModel, stats: &mut ModelResourceStats) {
    if let Some(holder) = model.holder.take() {
        commands
            .entity(holder)
            .remove::<(ScaleTween, Spin)>()
            .despawn();
    }
    model.scene = None;
    stats.disposed += 1;
}
