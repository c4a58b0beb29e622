use super::coordinator::{FlightCoordinator, SelectionOutcome};
use super::events::{
    FlightAborted, FlightCompleted, FlightDispatched, LandmarkSelected, OverlayOpenRequested,
    SelectionAccepted, TransportFinished,
};
use crate::engine::assets::bounds::MapBounds;
use crate::engine::assets::landmark::Landmarks;
use crate::engine::assets::scene_manifest::MapManifest;
use crate::engine::scene::projection::project_landmark;
use bevy::prelude::*;

/// Feed selections through the coordinator and dispatch accepted flights.
pub fn handle_landmark_selection(
    mut selections: EventReader<LandmarkSelected>,
    landmarks: Option<Res<Landmarks>>,
    bounds: Option<Res<MapBounds>>,
    mut coordinator: ResMut<FlightCoordinator>,
    mut accepted: EventWriter<SelectionAccepted>,
    mut dispatched: EventWriter<FlightDispatched>,
    mut completed: EventWriter<FlightCompleted>,
    mut overlay: EventWriter<OverlayOpenRequested>,
) {
    for selection in selections.read() {
        let landmark = landmarks
            .as_deref()
            .and_then(|catalogue| catalogue.get(&selection.landmark_id));

        let world_pos = match (selection.world_pos, landmark) {
            (Some(pos), _) => pos,
            (None, Some(landmark)) => match project_landmark(landmark, bounds.as_deref()) {
                Ok(pos) => pos,
                Err(err) => {
                    warn!("Ignoring selection: {err}");
                    continue;
                }
            },
            (None, None) => Vec3::ZERO,
        };

        match coordinator.on_landmark_selected(landmark, world_pos) {
            SelectionOutcome::Ignored(reason) => {
                debug!(
                    "Selection of '{}' ignored: {:?}",
                    selection.landmark_id, reason
                );
            }
            SelectionOutcome::ArrivedInPlace(landmark) => {
                info!("Already at '{}', opening overlay", landmark.id);
                accepted.write(SelectionAccepted {
                    landmark_id: landmark.id.clone(),
                });
                completed.write(FlightCompleted {
                    landmark_id: landmark.id.clone(),
                    target_pos: world_pos,
                });
                overlay.write(OverlayOpenRequested { landmark });
            }
            SelectionOutcome::Dispatched(plan) => {
                info!(
                    "Dispatching {} to '{}'",
                    plan.transport, plan.request.landmark.id
                );
                accepted.write(SelectionAccepted {
                    landmark_id: plan.request.landmark.id.clone(),
                });
                dispatched.write(FlightDispatched { plan });
            }
        }
    }
}

/// Record arrivals and open the overlay for the landmark that was flown to.
pub fn handle_transport_finished(
    mut finished: EventReader<TransportFinished>,
    mut coordinator: ResMut<FlightCoordinator>,
    mut completed: EventWriter<FlightCompleted>,
    mut overlay: EventWriter<OverlayOpenRequested>,
) {
    for arrival in finished.read() {
        let Some(landmark) = coordinator.on_flight_completed(arrival.target_pos) else {
            debug!("Arrival at '{}' had no pending request", arrival.landmark_id);
            continue;
        };
        completed.write(FlightCompleted {
            landmark_id: arrival.landmark_id.clone(),
            target_pos: arrival.target_pos,
        });
        overlay.write(OverlayOpenRequested { landmark });
    }
}

/// Release the lock for flights the animator refused. Not retried.
pub fn handle_flight_aborted(
    mut aborted: EventReader<FlightAborted>,
    mut coordinator: ResMut<FlightCoordinator>,
) {
    for abort in aborted.read() {
        if coordinator.abandon_pending().is_some() {
            warn!("Flight to '{}' dropped: {}", abort.landmark_id, abort.reason);
        }
    }
}

/// Seed the coordinator at the manifest's home landmark once bounds exist.
pub fn initialize_home_position(
    bounds: Res<MapBounds>,
    landmarks: Option<Res<Landmarks>>,
    manifest: Option<Res<MapManifest>>,
    mut coordinator: ResMut<FlightCoordinator>,
) {
    let (Some(landmarks), Some(manifest)) = (landmarks, manifest) else {
        return;
    };
    let Some(home_id) = manifest.home_landmark_id.as_deref() else {
        return;
    };
    let Some(home) = landmarks.get(home_id) else {
        warn!("Home landmark '{home_id}' is not in the catalogue");
        return;
    };

    match project_landmark(home, Some(&bounds)) {
        Ok(position) => {
            if coordinator.initialize_home(home, position) {
                info!("Flights start from home landmark '{}'", home.id);
            }
        }
        Err(err) => warn!("{err}"),
    }
}

/// Keep the last position on the map after its bounds were replaced.
pub fn reproject_last_position(
    bounds: Res<MapBounds>,
    mut coordinator: ResMut<FlightCoordinator>,
) {
    let Some(landmark) = coordinator.last_landmark().cloned() else {
        return;
    };
    match project_landmark(&landmark, Some(&bounds)) {
        Ok(position) => {
            if coordinator.rebase(position) {
                debug!("Last position re-projected onto '{}'", landmark.id);
            }
        }
        Err(err) => warn!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::landmark::LandmarkRecord;
    use crate::engine::flight::FlightPlugin;
    use crate::engine::transport::path::TransportKind;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(FlightPlugin);

        let record = |id: &str, lat: f64, lon: f64| LandmarkRecord {
            id: id.to_string(),
            model_uri: format!("model/{id}.glb"),
            latitude: Some(lat),
            longitude: Some(lon),
            island: Some("Java".to_string()),
            ..default()
        };
        app.insert_resource(Landmarks::from_records(&[
            record("monas", -6.2, 106.8),
            record("prambanan", -7.75, 110.49),
        ]));
        app.insert_resource(MapBounds::new(
            Vec3::new(-20.0, 0.0, -8.0),
            Vec3::new(20.0, 1.0, 8.0),
        ));
        app
    }

    fn drain<E: Event + Clone>(app: &mut App) -> Vec<E> {
        app.world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    fn select(app: &mut App, id: &str) {
        app.world_mut().send_event(LandmarkSelected {
            landmark_id: id.to_string(),
            world_pos: None,
        });
        app.update();
    }

    #[test]
    fn list_selection_is_projected_and_dispatched() {
        let mut app = app();
        select(&mut app, "monas");

        let dispatched = drain::<FlightDispatched>(&mut app);
        assert_eq!(dispatched.len(), 1);
        let plan = &dispatched[0].plan;
        assert_eq!(plan.transport, TransportKind::Plane);
        assert!(app.world().resource::<FlightCoordinator>().is_pending());
    }

    #[test]
    fn double_click_never_starts_a_second_flight() {
        let mut app = app();
        select(&mut app, "monas");
        let plan = drain::<FlightDispatched>(&mut app).remove(0).plan;

        app.world_mut().send_event(TransportFinished {
            landmark_id: "monas".to_string(),
            target_pos: plan.end,
        });
        app.update();
        assert_eq!(drain::<OverlayOpenRequested>(&mut app).len(), 1);
        assert_eq!(drain::<FlightCompleted>(&mut app).len(), 1);

        app.world_mut().send_event(LandmarkSelected {
            landmark_id: "monas".to_string(),
            world_pos: Some(plan.end),
        });
        app.update();

        assert!(drain::<FlightDispatched>(&mut app).is_empty());
        let overlays = drain::<OverlayOpenRequested>(&mut app);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].landmark.id, "monas");
        let completed = drain::<FlightCompleted>(&mut app);
        assert_eq!(completed[0].target_pos, plan.end);
    }

    #[test]
    fn aborted_flight_unlocks_the_coordinator() {
        let mut app = app();
        select(&mut app, "prambanan");
        drain::<FlightDispatched>(&mut app);

        app.world_mut().send_event(FlightAborted {
            landmark_id: "prambanan".to_string(),
            reason: crate::engine::error::MapError::AnimatorNotReady {
                kind: TransportKind::Plane,
            },
        });
        app.update();
        assert!(!app.world().resource::<FlightCoordinator>().is_pending());

        select(&mut app, "prambanan");
        assert_eq!(drain::<FlightDispatched>(&mut app).len(), 1);
    }

    #[test]
    fn ignored_selection_is_not_accepted() {
        let mut app = app();
        select(&mut app, "monas");
        assert_eq!(
            drain::<SelectionAccepted>(&mut app),
            [SelectionAccepted {
                landmark_id: "monas".to_string()
            }]
        );

        // Pending flight locks out the next click.
        select(&mut app, "prambanan");
        assert!(drain::<SelectionAccepted>(&mut app).is_empty());
        select(&mut app, "atlantis");
        assert!(drain::<SelectionAccepted>(&mut app).is_empty());
    }

    #[test]
    fn last_position_follows_replaced_bounds() {
        let mut app = app();
        select(&mut app, "monas");
        let plan = drain::<FlightDispatched>(&mut app).remove(0).plan;
        app.world_mut().send_event(TransportFinished {
            landmark_id: "monas".to_string(),
            target_pos: plan.end,
        });
        app.update();

        let wider = MapBounds::new(Vec3::new(-40.0, 0.0, -16.0), Vec3::new(40.0, 2.0, 16.0));
        app.insert_resource(wider);
        app.update();

        let landmarks = app.world().resource::<Landmarks>();
        let expected = project_landmark(landmarks.get("monas").unwrap(), Some(&wider)).unwrap();
        assert_ne!(expected, plan.end);
        assert_eq!(
            app.world().resource::<FlightCoordinator>().last_position(),
            Some(expected)
        );

        // The re-placed marker is still where the vehicle stands.
        drain::<OverlayOpenRequested>(&mut app);
        app.world_mut().send_event(LandmarkSelected {
            landmark_id: "monas".to_string(),
            world_pos: Some(expected),
        });
        app.update();
        assert!(drain::<FlightDispatched>(&mut app).is_empty());
        assert_eq!(drain::<OverlayOpenRequested>(&mut app).len(), 1);
    }
}
