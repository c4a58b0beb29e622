//! JSON-RPC 2.0 bridge to the host web page.
//!
//! The map runs in an iframe and talks to the page through postMessage,
//! answering requests and pushing notifications about flights and loading.
//! Native builds keep the same plumbing but never send anything.
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Bevy (iframe)
//!        │                                     │
//!        ├─ Request (with ID) ───────────────> │
//!        │ <──────────────── Response (with ID)┤
//!        ├─ Notification (no ID) ────────────> │  executed, never answered
//!        │ <────────── Notification (no ID) ───┤
//! ```
//!
//! ## Methods
//!
//! - `fly_to_landmark {id}`: Select a landmark, as if its marker was clicked
//! - `set_hovered_landmark {id | null}`: Preview a landmark's model
//! - `get_landmarks`: List the catalogue with display numbers
//! - `get_fps`: Retrieve current frame rate
//!
//! ## Notifications
//!
//! - `loading_progress`: Startup milestones as a percentage and stage name
//! - `landmark_selected`, `flight_started`, `flight_completed`: Flight lifecycle
//! - `overlay_open`: Landmark details to show after arrival
//! - `hover_changed`: Marker under the pointer, or `null`
//! - `fps_update`: Frame rate, twice per second
//!
//! Errors use the standard codes: `-32601` method not found, `-32602`
//! invalid params, `-32603` internal error.

/// Message queueing, request dispatch and notification forwarding.
pub mod web_rpc;
