use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::constants::ui::FPS_NOTIFY_INTERVAL;
use crate::engine::core::app_state::FpsText;
use crate::rpc::web_rpc::WebRpcInterface;

pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL {
        return;
    }
    if let Some(value) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification(
            "fps_update",
            serde_json::json!({
                "fps": value as f32
            }),
        );
        *last_send_time = current_time;
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}
