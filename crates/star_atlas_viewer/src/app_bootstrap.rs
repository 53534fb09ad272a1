use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use super::free_look::free_look_controls;
use super::headless::{drive_headless_tour, headless_report, HeadlessTour};
use super::interaction::{
    apply_view_commands, emit_pointer_clicks, handle_back_hotkey, resolve_pointer_picks,
    ViewCorePlugin,
};
use super::presentation::render_presentation_egui;
use super::shimmer::update_star_shimmer;
use super::viewer_config::ViewerConfig;
use super::*;

const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

pub(super) fn run_ui(catalog: AtlasCatalog, config: ViewerConfig) {
    App::new()
        .insert_resource(catalog)
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Star Atlas".to_string(),
                resolution: (1200, 800).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(ViewCorePlugin::new(config))
        .add_systems(
            Update,
            (
                emit_pointer_clicks.before(resolve_pointer_picks),
                handle_back_hotkey.before(apply_view_commands),
                free_look_controls.after(update_star_shimmer),
            ),
        )
        .add_systems(EguiPrimaryContextPass, render_presentation_egui)
        .run();
}

pub(super) fn run_headless(catalog: AtlasCatalog, config: ViewerConfig) {
    App::new()
        .insert_resource(catalog)
        .insert_resource(HeadlessTour::default())
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(HEADLESS_FRAME)))
        .add_plugins(LogPlugin::default())
        .add_plugins(ViewCorePlugin::new(config))
        .add_systems(
            Update,
            (
                drive_headless_tour.before(apply_view_commands),
                headless_report.after(update_star_shimmer),
            ),
        )
        .run();
}
