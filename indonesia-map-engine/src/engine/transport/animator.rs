use super::job::{TransportJob, TransportRun};
use super::path::{TransportKind, TransportPath};
use super::rails::{RailSegment, clear_rails, spawn_rails};
use super::vehicles::{TransportModels, TransportVehicle, ensure_vehicle_ready};
use crate::engine::flight::events::{
    FlightAborted, FlightDispatched, FlightStarted, TransportFinished,
};
use bevy::prelude::*;
use constants::transport::VEHICLE_PARK_POSITION;

/// Runtime switches for the animator, taken from the manifest.
#[derive(Resource, Debug, Clone, Default)]
pub struct TransportSettings {
    pub rails_enabled: bool,
}

type VehicleQuery<'w, 's> =
    Query<'w, 's, (&'static TransportVehicle, &'static mut Transform, &'static mut Visibility)>;

/// Arm a run for each dispatched flight, replacing any run in progress.
pub fn start_transport_runs(
    mut dispatched: EventReader<FlightDispatched>,
    asset_server: Res<AssetServer>,
    models: Option<Res<TransportModels>>,
    settings: Res<TransportSettings>,
    mut job: ResMut<TransportJob>,
    mut vehicles: VehicleQuery,
    rails: Query<Entity, With<RailSegment>>,
    mut commands: Commands,
    mut started: EventWriter<FlightStarted>,
    mut aborted: EventWriter<FlightAborted>,
) {
    for FlightDispatched { plan } in dispatched.read() {
        let landmark_id = plan.request.landmark.id.clone();

        if let Err(reason) = ensure_vehicle_ready(&asset_server, models.as_deref(), plan.transport)
        {
            warn!("{reason}");
            aborted.write(FlightAborted {
                landmark_id,
                reason,
            });
            continue;
        }

        if let Some(killed) = job.kill() {
            debug!("Killed {} run to '{}'", killed.kind(), killed.landmark_id());
            park_vehicle(&mut vehicles, killed.kind());
        }
        clear_rails(&mut commands, &rails);

        let path = TransportPath::new(plan.transport, plan.start, plan.end);
        let start = path.sample(0.0);
        for (vehicle, mut transform, mut visibility) in vehicles.iter_mut() {
            if vehicle.kind != plan.transport {
                continue;
            }
            transform.translation = start.position;
            if let Some(yaw) = start.yaw {
                transform.rotation = Quat::from_rotation_y(yaw);
            }
            *visibility = Visibility::Visible;
        }

        if plan.transport == TransportKind::Train && settings.rails_enabled {
            if let Some(rail) = models.as_deref().and_then(|m| m.rail.clone()) {
                spawn_rails(&mut commands, rail, path.start(), path.end());
            }
        }

        started.write(FlightStarted {
            landmark_id: landmark_id.clone(),
            transport: plan.transport,
            duration: path.duration(),
        });
        job.start(TransportRun::new(path, landmark_id, plan.end));
    }
}

/// Move the active vehicle and finish its run at `t = 1`.
pub fn advance_transport_job(
    time: Res<Time>,
    mut job: ResMut<TransportJob>,
    mut vehicles: VehicleQuery,
    rails: Query<Entity, With<RailSegment>>,
    mut commands: Commands,
    mut finished: EventWriter<TransportFinished>,
) {
    let Some(run) = job.active_mut() else {
        return;
    };
    let kind = run.kind();
    let step = run.advance(time.delta_secs());

    for (vehicle, mut transform, _) in vehicles.iter_mut() {
        if vehicle.kind != kind {
            continue;
        }
        transform.translation = step.sample.position;
        if let Some(yaw) = step.sample.yaw {
            transform.rotation = Quat::from_rotation_y(yaw);
        }
    }

    if !step.finished {
        return;
    }

    // Job is cleared before reporting; one completion per run.
    if let Some(run) = job.kill() {
        park_vehicle(&mut vehicles, kind);
        clear_rails(&mut commands, &rails);
        info!("{} arrived at '{}'", kind, run.landmark_id());
        finished.write(TransportFinished {
            landmark_id: run.landmark_id().to_string(),
            target_pos: run.target(),
        });
    }
}

/// Stop any run when the map session ends. No completion is reported.
pub fn kill_transport_job(
    mut job: ResMut<TransportJob>,
    mut vehicles: VehicleQuery,
    rails: Query<Entity, With<RailSegment>>,
    mut commands: Commands,
) {
    if let Some(run) = job.kill() {
        park_vehicle(&mut vehicles, run.kind());
    }
    clear_rails(&mut commands, &rails);
}

fn park_vehicle(vehicles: &mut VehicleQuery, kind: TransportKind) {
    for (vehicle, mut transform, mut visibility) in vehicles.iter_mut() {
        if vehicle.kind == kind {
            transform.translation = VEHICLE_PARK_POSITION;
            *visibility = Visibility::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::landmark::{Landmark, LandmarkRecord};
    use crate::engine::flight::coordinator::{FlightPlan, FlightRequest};
    use crate::engine::transport::rails::rail_layout;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<TransportJob>()
            .add_event::<TransportFinished>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_systems(Update, advance_transport_job);
        app.world_mut().spawn((
            TransportVehicle {
                kind: TransportKind::Plane,
            },
            Transform::default(),
            Visibility::Visible,
        ));
        app
    }

    fn finished(app: &mut App) -> Vec<TransportFinished> {
        app.world_mut()
            .resource_mut::<Events<TransportFinished>>()
            .drain()
            .collect()
    }

    #[test]
    fn run_reports_completion_exactly_once() {
        let mut app = app();
        let end = Vec3::new(3.0, 0.5, -1.0);
        let path = TransportPath::new(TransportKind::Plane, Vec3::ZERO, end);
        app.world_mut()
            .resource_mut::<TransportJob>()
            .start(TransportRun::new(path, "monas", end));

        let mut completions = Vec::new();
        for _ in 0..40 {
            app.update();
            completions.extend(finished(&mut app));
        }

        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].target_pos, end);
        assert!(app.world().resource::<TransportJob>().is_idle());

        let mut vehicles = app.world_mut().query::<(&Transform, &Visibility)>();
        let (transform, visibility) = vehicles.single(app.world()).unwrap();
        assert_eq!(*visibility, Visibility::Hidden);
        assert_eq!(transform.translation, VEHICLE_PARK_POSITION);
    }

    #[test]
    fn killed_run_never_completes() {
        let mut app = app();
        let end = Vec3::new(8.0, 0.2, 0.0);
        let path = TransportPath::new(TransportKind::Plane, Vec3::ZERO, end);
        app.world_mut()
            .resource_mut::<TransportJob>()
            .start(TransportRun::new(path, "monas", end));

        app.update();
        app.update();
        app.world_mut().resource_mut::<TransportJob>().kill();
        for _ in 0..40 {
            app.update();
        }
        assert!(finished(&mut app).is_empty());
    }

    fn plan(id: &str, transport: TransportKind, start: Vec3, end: Vec3) -> FlightPlan {
        let landmark =
            Landmark::from_record(&LandmarkRecord { id: id.into(), ..default() }, 0, 1).unwrap();
        FlightPlan {
            request: FlightRequest {
                landmark,
                target_pos: end,
                origin_landmark: None,
            },
            start,
            end,
            transport,
        }
    }

    fn dispatch_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Scene>()
            .init_resource::<TransportJob>()
            .init_resource::<TransportSettings>()
            .add_event::<FlightDispatched>()
            .add_event::<FlightStarted>()
            .add_event::<FlightAborted>()
            .add_event::<TransportFinished>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_systems(Update, (start_transport_runs, advance_transport_job).chain());
        app
    }

    /// Vehicle scenes that count as loaded from the first frame on.
    fn with_ready_vehicles(app: &mut App) {
        let asset_server = app.world().resource::<AssetServer>().clone();
        let models = TransportModels {
            plane: asset_server.add(Scene::new(World::new())),
            train: asset_server.add(Scene::new(World::new())),
            rail: Some(asset_server.add(Scene::new(World::new()))),
        };
        for kind in [TransportKind::Plane, TransportKind::Train] {
            app.world_mut().spawn((
                TransportVehicle { kind },
                Transform::from_translation(VEHICLE_PARK_POSITION),
                Visibility::Hidden,
            ));
        }
        app.insert_resource(models);
    }

    fn vehicle(app: &mut App, kind: TransportKind) -> (Transform, Visibility) {
        let world = app.world_mut();
        world
            .query::<(&TransportVehicle, &Transform, &Visibility)>()
            .iter(world)
            .find(|(vehicle, _, _)| vehicle.kind == kind)
            .map(|(_, transform, visibility)| (*transform, *visibility))
            .unwrap()
    }

    fn rail_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&RailSegment>().iter(world).count()
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    #[test]
    fn dispatch_without_vehicle_models_aborts() {
        let mut app = dispatch_app();
        app.world_mut().send_event(FlightDispatched {
            plan: plan("monas", TransportKind::Train, Vec3::ZERO, Vec3::X),
        });
        app.update();

        assert_eq!(drain::<FlightAborted>(&mut app).len(), 1);
        assert!(drain::<FlightStarted>(&mut app).is_empty());
        assert!(app.world().resource::<TransportJob>().is_idle());
    }

    #[test]
    fn train_run_lays_rails_and_finishes_once() {
        let mut app = dispatch_app();
        app.world_mut().resource_mut::<TransportSettings>().rails_enabled = true;
        with_ready_vehicles(&mut app);

        let end = Vec3::new(6.0, 0.4, 0.0);
        app.world_mut().send_event(FlightDispatched {
            plan: plan("prambanan", TransportKind::Train, Vec3::ZERO, end),
        });
        // First frame has zero delta: the train sits on its start point.
        app.update();

        let path = TransportPath::new(TransportKind::Train, Vec3::ZERO, end);
        let (transform, visibility) = vehicle(&mut app, TransportKind::Train);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation, path.start());
        assert_eq!(vehicle(&mut app, TransportKind::Plane).1, Visibility::Hidden);
        assert_eq!(rail_count(&mut app), rail_layout(path.start(), path.end()).len());

        let started = drain::<FlightStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].transport, TransportKind::Train);
        assert_eq!(started[0].duration, path.duration());

        let mut completions = Vec::new();
        for _ in 0..60 {
            app.update();
            completions.extend(drain::<TransportFinished>(&mut app));
        }

        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].landmark_id, "prambanan");
        assert_eq!(completions[0].target_pos, end);
        assert_eq!(rail_count(&mut app), 0);
        assert!(app.world().resource::<TransportJob>().is_idle());

        let (transform, visibility) = vehicle(&mut app, TransportKind::Train);
        assert_eq!(visibility, Visibility::Hidden);
        assert_eq!(transform.translation, VEHICLE_PARK_POSITION);
    }

    #[test]
    fn rails_stay_off_unless_enabled() {
        let mut app = dispatch_app();
        with_ready_vehicles(&mut app);

        app.world_mut().send_event(FlightDispatched {
            plan: plan("prambanan", TransportKind::Train, Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)),
        });
        app.update();

        assert_eq!(drain::<FlightStarted>(&mut app).len(), 1);
        assert_eq!(vehicle(&mut app, TransportKind::Train).1, Visibility::Visible);
        assert_eq!(rail_count(&mut app), 0);
    }

    #[test]
    fn new_flight_kills_the_running_one() {
        let mut app = dispatch_app();
        app.world_mut().resource_mut::<TransportSettings>().rails_enabled = true;
        with_ready_vehicles(&mut app);

        app.world_mut().send_event(FlightDispatched {
            plan: plan("prambanan", TransportKind::Train, Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)),
        });
        app.update();
        app.update();
        assert!(rail_count(&mut app) > 0);

        let end = Vec3::new(-3.0, 0.5, 4.0);
        app.world_mut().send_event(FlightDispatched {
            plan: plan("jam-gadang", TransportKind::Plane, Vec3::new(6.0, 0.2, 0.0), end),
        });
        app.update();

        assert_eq!(
            app.world().resource::<TransportJob>().kind(),
            Some(TransportKind::Plane)
        );
        let (train, train_visibility) = vehicle(&mut app, TransportKind::Train);
        assert_eq!(train_visibility, Visibility::Hidden);
        assert_eq!(train.translation, VEHICLE_PARK_POSITION);
        assert_eq!(vehicle(&mut app, TransportKind::Plane).1, Visibility::Visible);
        assert_eq!(rail_count(&mut app), 0);

        let mut completions = Vec::new();
        for _ in 0..60 {
            app.update();
            completions.extend(drain::<TransportFinished>(&mut app));
        }
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].landmark_id, "jam-gadang");
        assert_eq!(completions[0].target_pos, end);
    }
}
