use bevy::prelude::{Resource, Vec3};

use super::camera_flight::CameraPose;

const DEFAULT_OVERVIEW_DISTANCE: f32 = 100.0;
const DEFAULT_EXPLORE_OFFSET: f32 = 35.0;
const DEFAULT_SHIMMER_ENABLED: bool = true;
const DEFAULT_STARFIELD_COUNT: usize = 15_000;
const DEFAULT_LINE_PICK_THRESHOLD: f32 = 1.0;
const MAX_STARFIELD_COUNT: usize = 200_000;

pub(super) const HEADLESS_ENV: &str = "STAR_ATLAS_VIEWER_HEADLESS";

#[derive(Clone, Copy, Debug, PartialEq, Resource)]
pub(super) struct ViewerConfig {
    pub overview_distance: f32,
    pub explore_offset: f32,
    pub shimmer_enabled: bool,
    pub starfield_count: usize,
    pub line_pick_threshold: f32,
}

impl ViewerConfig {
    /// Camera pose of the overview: on +Z, looking at the origin.
    pub(super) fn overview_pose(&self) -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.0, self.overview_distance), Vec3::ZERO)
    }

    /// Offset from a group's position to the exploring camera position.
    pub(super) fn explore_offset_vec(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.explore_offset)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            overview_distance: DEFAULT_OVERVIEW_DISTANCE,
            explore_offset: DEFAULT_EXPLORE_OFFSET,
            shimmer_enabled: DEFAULT_SHIMMER_ENABLED,
            starfield_count: DEFAULT_STARFIELD_COUNT,
            line_pick_threshold: DEFAULT_LINE_PICK_THRESHOLD,
        }
    }
}

pub(super) fn resolve_viewer_config() -> ViewerConfig {
    load_viewer_config_from(|key| std::env::var(key).ok())
}

pub(super) fn resolve_headless() -> bool {
    std::env::var(HEADLESS_ENV).is_ok()
}

fn load_viewer_config_from<F>(lookup: F) -> ViewerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ViewerConfig::default();
    if let Some(value) = parse_f32(&lookup, "STAR_ATLAS_VIEWER_OVERVIEW_DISTANCE") {
        if value.is_finite() && value > 0.0 {
            config.overview_distance = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "STAR_ATLAS_VIEWER_EXPLORE_OFFSET") {
        if value.is_finite() && value > 0.0 {
            config.explore_offset = value;
        }
    }
    if let Some(value) = parse_bool(&lookup, "STAR_ATLAS_VIEWER_SHIMMER") {
        config.shimmer_enabled = value;
    }
    if let Some(value) = parse_usize(&lookup, "STAR_ATLAS_VIEWER_STARFIELD_COUNT") {
        if value <= MAX_STARFIELD_COUNT {
            config.starfield_count = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "STAR_ATLAS_VIEWER_LINE_PICK_THRESHOLD") {
        if value.is_finite() && value >= 0.0 {
            config.line_pick_threshold = value;
        }
    }
    config
}

fn parse_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

fn parse_f32<F>(lookup: &F, key: &str) -> Option<f32>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<f32>().ok())
}

fn parse_usize<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_place_camera_on_positive_z() {
        let config = ViewerConfig::default();
        assert_eq!(config.overview_pose().position, Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(config.overview_pose().look_at, Vec3::ZERO);
        assert_eq!(config.explore_offset_vec(), Vec3::new(0.0, 0.0, 35.0));
        assert!(config.shimmer_enabled);
        assert_eq!(config.starfield_count, 15_000);
        assert!((config.line_pick_threshold - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = load_viewer_config_from(lookup_from(&[
            ("STAR_ATLAS_VIEWER_OVERVIEW_DISTANCE", "140"),
            ("STAR_ATLAS_VIEWER_EXPLORE_OFFSET", " 20.5 "),
            ("STAR_ATLAS_VIEWER_SHIMMER", "off"),
            ("STAR_ATLAS_VIEWER_STARFIELD_COUNT", "0"),
            ("STAR_ATLAS_VIEWER_LINE_PICK_THRESHOLD", "0.25"),
        ]));
        assert_eq!(config.overview_distance, 140.0);
        assert_eq!(config.explore_offset, 20.5);
        assert!(!config.shimmer_enabled);
        assert_eq!(config.starfield_count, 0);
        assert_eq!(config.line_pick_threshold, 0.25);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = load_viewer_config_from(lookup_from(&[
            ("STAR_ATLAS_VIEWER_OVERVIEW_DISTANCE", "-5"),
            ("STAR_ATLAS_VIEWER_EXPLORE_OFFSET", "NaN"),
            ("STAR_ATLAS_VIEWER_SHIMMER", "maybe"),
            ("STAR_ATLAS_VIEWER_STARFIELD_COUNT", "9999999"),
            ("STAR_ATLAS_VIEWER_LINE_PICK_THRESHOLD", "wide"),
        ]));
        assert_eq!(config, ViewerConfig::default());
    }
}
