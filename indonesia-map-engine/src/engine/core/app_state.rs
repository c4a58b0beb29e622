use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

/// Native overlay line describing the current flight.
#[derive(Component)]
pub struct StatusText;

/// Enter `Running` once the base map has been measured.
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.bounds_ready {
        info!("→ Map bounds ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Report loading milestones to the frontend whenever they change.
pub fn update_loading_frontend(
    loading_progress: Res<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !loading_progress.is_changed() {
        return;
    }
    rpc_interface.send_notification(
        "loading_progress",
        serde_json::json!({
            "progress": loading_progress.percent(),
            "stage": loading_progress.stage(),
        }),
    );
}
