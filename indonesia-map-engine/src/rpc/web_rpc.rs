use crate::engine::assets::landmark::{Landmark, Landmarks};
use crate::engine::flight::events::{
    ExternalHover, FlightCompleted, FlightStarted, HoverChanged, LandmarkSelected,
    OverlayOpenRequested, SelectionAccepted,
};
use crate::engine::flight::FlightSet;
use crate::engine::systems::fps_tracking::smoothed_fps;
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing traffic for the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge for iframe deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(FlightSet::Input),
            )
            .add_systems(
                Update,
                (forward_flight_notifications, send_outgoing_messages)
                    .chain()
                    .after(FlightSet::Resolve),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC bridge disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Ownership moves to JS for the lifetime of the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages posted by the host page, drained every frame.
#[derive(Resource, Default)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

/// What incoming requests may read and trigger.
#[derive(SystemParam)]
struct RpcContext<'w> {
    diagnostics: Res<'w, DiagnosticsStore>,
    landmarks: Option<Res<'w, Landmarks>>,
    external_hover: ResMut<'w, ExternalHover>,
    selections: EventWriter<'w, LandmarkSelected>,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
            }
        }
    }
}

/// Run a request and build its response. Notifications (no `id`) are
/// executed but never answered.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "fly_to_landmark" => handle_fly_to_landmark(&request.params, context),
        "set_hovered_landmark" => handle_set_hovered_landmark(&request.params, context),
        "get_landmarks" => handle_get_landmarks(context.landmarks.as_deref()),
        "get_fps" => handle_get_fps(&context.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Queue a selection from the host's landmark list. Arbitration happens in
/// the coordinator, so an accepted request does not guarantee a flight.
fn handle_fly_to_landmark(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct FlyToParams {
        id: String,
    }

    let parsed = serde_json::from_value::<FlyToParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;

    let known = context
        .landmarks
        .as_deref()
        .is_some_and(|catalogue| catalogue.get(&parsed.id).is_some());
    if !known {
        return Err(RpcError::invalid_params(&format!(
            "Unknown landmark: {}",
            parsed.id
        )));
    }

    context.selections.write(LandmarkSelected {
        landmark_id: parsed.id.clone(),
        world_pos: None,
    });
    info!("Fly-to requested from host for '{}'", parsed.id);

    Ok(serde_json::json!({
        "success": true,
        "id": parsed.id
    }))
}

/// `id: null` (or a missing id) clears the external hover.
fn handle_set_hovered_landmark(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize, Default)]
    struct HoverParams {
        #[serde(default)]
        id: Option<String>,
    }

    let parsed = if params.is_null() {
        HoverParams::default()
    } else {
        serde_json::from_value::<HoverParams>(params.clone())
            .map_err(|_| RpcError::invalid_params("Expected 'id' to be a string or null"))?
    };

    context.external_hover.set_if_neq(ExternalHover {
        landmark_id: parsed.id.clone(),
    });

    Ok(serde_json::json!({
        "success": true,
        "id": parsed.id
    }))
}

fn handle_get_landmarks(landmarks: Option<&Landmarks>) -> Result<serde_json::Value, RpcError> {
    let Some(landmarks) = landmarks else {
        return Err(RpcError::internal_error("Landmarks are still loading"));
    };

    let list: Vec<serde_json::Value> = landmarks
        .iter()
        .map(|l| {
            serde_json::json!({
                "id": l.id,
                "name": l.name,
                "display_index": l.display_index,
                "island": l.island,
                "location": l.location,
            })
        })
        .collect();

    Ok(serde_json::json!({ "landmarks": list }))
}

fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = smoothed_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn landmark_payload(landmark: &Landmark) -> serde_json::Value {
    serde_json::json!({
        "id": landmark.id,
        "name": landmark.name,
        "description": landmark.description,
        "location": landmark.location,
        "island": landmark.island,
        "street_view_url": landmark.street_view_url,
        "display_index": landmark.display_index,
    })
}

/// Mirror the fly-to lifecycle to the host page.
fn forward_flight_notifications(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut selected: EventReader<SelectionAccepted>,
    mut started: EventReader<FlightStarted>,
    mut completed: EventReader<FlightCompleted>,
    mut overlay: EventReader<OverlayOpenRequested>,
    mut hover: EventReader<HoverChanged>,
) {
    for event in selected.read() {
        rpc_interface.send_notification(
            "landmark_selected",
            serde_json::json!({ "id": event.landmark_id }),
        );
    }
    for event in started.read() {
        rpc_interface.send_notification(
            "flight_started",
            serde_json::json!({
                "id": event.landmark_id,
                "transport": event.transport,
                "duration": event.duration,
            }),
        );
    }
    for event in completed.read() {
        let pos = event.target_pos;
        rpc_interface.send_notification(
            "flight_completed",
            serde_json::json!({
                "id": event.landmark_id,
                "target_pos": [pos.x, pos.y, pos.z],
            }),
        );
    }
    for event in overlay.read() {
        rpc_interface.send_notification(
            "overlay_open",
            serde_json::json!({ "landmark": landmark_payload(&event.landmark) }),
        );
    }
    for event in hover.read() {
        rpc_interface.send_notification(
            "hover_changed",
            serde_json::json!({ "id": event.landmark_id }),
        );
    }
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
