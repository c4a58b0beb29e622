/// Asset paths relative to the asset root.
pub mod path;

/// Window, overlay and frontend notification settings.
pub mod ui;
