/// Manifest describing the base map, vehicles and landmarks.
pub const MANIFEST_PATH: &str = "data/map_manifest.json";
