use bevy::prelude::*;
use bevy::window::PresentMode;

use crate::constants::ui::WINDOW_TITLE;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        use crate::constants::ui::CANVAS_SELECTOR;

        Window {
            title: WINDOW_TITLE.to_string(),
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: WINDOW_TITLE.to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
