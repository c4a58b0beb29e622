use bevy::prelude::*;

use crate::engine::core::app_state::StatusText;
use crate::engine::flight::coordinator::FlightCoordinator;
use crate::engine::transport::job::TransportJob;

pub fn status_line(job: &TransportJob, coordinator: &FlightCoordinator) -> String {
    if let Some(run) = job.active() {
        return format!(
            "{} to {} ({:.0}%)",
            run.kind(),
            run.landmark_id(),
            run.progress() * 100.0
        );
    }
    match coordinator.last_landmark() {
        Some(landmark) => format!("At {}", landmark.name),
        None => "Choose a landmark".to_string(),
    }
}

pub fn status_text_update_system(
    job: Res<TransportJob>,
    coordinator: Res<FlightCoordinator>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    if !job.is_changed() && !coordinator.is_changed() {
        return;
    }
    let line = status_line(&job, &coordinator);
    for mut text in &mut query {
        if text.0 != line {
            text.0 = line.clone();
        }
    }
}
