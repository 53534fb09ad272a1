use std::time::Duration;

use bevy::app::TaskPoolPlugin;
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use star_atlas::builtin_catalog;

use super::depth_morph::{DepthMorphSlot, MorphRequested};
use super::interaction::{PointerClick, ViewCorePlugin};
use super::line_follower::ConnectorLine;
use super::presentation::PresentationState;
use super::view_state::{ViewState, ViewStateMachine};
use super::viewer_config::ViewerConfig;
use super::{AtlasCatalog, GroupMarker, StarMarker, ViewCommand, ViewerCamera};

const VIEWPORT: Vec2 = Vec2::new(1200.0, 800.0);
const FRAME_MS: u64 = 16;

fn scenario_app() -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.insert_resource(AtlasCatalog(builtin_catalog()));
    app.add_plugins((TaskPoolPlugin::default(), TransformPlugin));
    app.add_plugins(ViewCorePlugin::new(ViewerConfig {
        shimmer_enabled: false,
        ..ViewerConfig::default()
    }));
    app.update();
    app
}

fn step(app: &mut App, delta_ms: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(delta_ms));
    app.update();
}

fn state(app: &App) -> ViewState {
    app.world().resource::<ViewStateMachine>().state()
}

fn selection(app: &App) -> Option<Entity> {
    app.world().resource::<ViewStateMachine>().selection()
}

fn presentation(app: &App) -> PresentationState {
    app.world().resource::<PresentationState>().clone()
}

fn camera_transform(app: &mut App) -> Transform {
    let world = app.world_mut();
    let mut cameras = world.query_filtered::<&Transform, With<ViewerCamera>>();
    *cameras.single(world).expect("viewer camera")
}

fn group(app: &mut App, name: &str) -> Entity {
    let world = app.world_mut();
    let mut groups = world.query::<(Entity, &GroupMarker)>();
    groups
        .iter(world)
        .find(|(_, marker)| marker.name == name)
        .map(|(entity, _)| entity)
        .expect("group spawned")
}

fn group_stars(app: &mut App, name: &str) -> Vec<Entity> {
    let group = group(app, name);
    app.world()
        .get::<GroupMarker>(group)
        .map(|marker| marker.stars.clone())
        .expect("group marker")
}

/// Star entity and its current world position.
fn star(app: &mut App, name: &str) -> (Entity, Vec3) {
    let world = app.world_mut();
    let mut stars = world.query::<(Entity, &StarMarker, &Transform)>();
    let (entity, group, local) = stars
        .iter(world)
        .find(|(_, marker, _)| marker.details.name == name)
        .map(|(entity, marker, transform)| (entity, marker.group, transform.translation))
        .expect("star spawned");
    let root = world.get::<Transform>(group).copied().expect("group root");
    (entity, root.transform_point(local))
}

fn star_depth(app: &App, star: Entity) -> f32 {
    app.world()
        .get::<Transform>(star)
        .map(|transform| transform.translation.z)
        .expect("star transform")
}

/// Window pixel that the viewer camera projects `point` onto.
fn pointer_for(app: &mut App, point: Vec3) -> Vec2 {
    let camera = camera_transform(app);
    let view = camera.compute_affine().inverse().transform_point3(point);
    let tan_half = (75.0_f32.to_radians() * 0.5).tan();
    let aspect = VIEWPORT.x / VIEWPORT.y;
    let ndc = Vec2::new(
        view.x / (-view.z * tan_half * aspect),
        view.y / (-view.z * tan_half),
    );
    Vec2::new((ndc.x + 1.0) * 0.5 * VIEWPORT.x, (1.0 - ndc.y) * 0.5 * VIEWPORT.y)
}

fn ray_toward(app: &mut App, point: Vec3) -> Ray3d {
    let origin = camera_transform(app).translation;
    Ray3d::new(origin, Dir3::new(point - origin).expect("camera is not at the target"))
}

/// Straight up from the camera, past every group.
fn sky_ray(app: &mut App) -> Ray3d {
    Ray3d::new(camera_transform(app).translation, Dir3::Y)
}

fn click_at(app: &mut App, position: Vec2, ray: Ray3d) {
    app.world_mut().write_message(PointerClick { position, ray });
    step(app, FRAME_MS);
}

fn click_on(app: &mut App, point: Vec3) -> Vec2 {
    let position = pointer_for(app, point);
    let ray = ray_toward(app, point);
    click_at(app, position, ray);
    position
}

fn explore_big_dipper(app: &mut App) {
    let (_, alkaid) = star(app, "Alkaid");
    click_on(app, alkaid);
    assert_eq!(state(app), ViewState::Transitioning);
    step(app, 1500);
    assert_eq!(state(app), ViewState::Exploring);
    step(app, 1000);
}

#[test]
fn clicking_a_group_in_overview_flies_in_and_shows_its_panel() {
    let mut app = scenario_app();
    assert_eq!(state(&app), ViewState::Overview);
    assert!(presentation(&app).overview_header_visible);

    let (_, alkaid) = star(&mut app, "Alkaid");
    click_on(&mut app, alkaid);
    assert_eq!(state(&app), ViewState::Transitioning);
    assert!(!presentation(&app).overview_header_visible);

    step(&mut app, 750);
    assert_eq!(state(&app), ViewState::Transitioning);

    step(&mut app, 750);
    assert_eq!(state(&app), ViewState::Exploring);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(-75.0, -20.0, 35.0));
    let shown = presentation(&app);
    let panel = shown.info_panel.expect("info panel");
    assert_eq!(panel.name, "Big Dipper");
    assert!(panel.text.starts_with("The Big Dipper is an asterism"));
    assert!(shown.return_visible);
}

#[test]
fn exploring_unfolds_depth_and_connectors_follow() {
    let mut app = scenario_app();
    let (dubhe, _) = star(&mut app, "Dubhe");
    assert_eq!(star_depth(&app, dubhe), 0.0);

    explore_big_dipper(&mut app);

    let catalog = builtin_catalog();
    let profile = catalog
        .group("Big Dipper")
        .and_then(|spec| spec.depth_profile())
        .expect("depth profile");
    assert_eq!(star_depth(&app, dubhe), profile[5]);

    let world = app.world_mut();
    let mut lines = world.query::<&ConnectorLine>();
    let attached = lines
        .iter(world)
        .filter(|line| line.from == dubhe || line.to == dubhe)
        .all(|line| {
            let endpoint = if line.from == dubhe { line.start } else { line.end };
            endpoint.z == profile[5]
        });
    assert!(attached);
}

#[test]
fn clicking_the_same_star_twice_toggles_the_popup() {
    let mut app = scenario_app();
    explore_big_dipper(&mut app);

    let (dubhe, position) = star(&mut app, "Dubhe");
    let pointer = click_on(&mut app, position);
    assert_eq!(selection(&app), Some(dubhe));
    let popup = presentation(&app).star_popup.expect("popup");
    assert_eq!(popup.star.name, "Dubhe");
    assert_eq!(popup.star.distance, "123 ly");
    assert_eq!(popup.screen_position, pointer + Vec2::new(10.0, 10.0));

    let ray = ray_toward(&mut app, position);
    click_at(&mut app, pointer, ray);
    assert_eq!(selection(&app), None);
    assert_eq!(presentation(&app).star_popup, None);
}

#[test]
fn clicking_empty_sky_clears_selection() {
    let mut app = scenario_app();
    explore_big_dipper(&mut app);
    let (_, mizar) = star(&mut app, "Mizar");
    click_on(&mut app, mizar);
    assert!(selection(&app).is_some());

    let ray = sky_ray(&mut app);
    click_at(&mut app, Vec2::new(2.0, 2.0), ray);

    assert_eq!(selection(&app), None);
    assert_eq!(presentation(&app).star_popup, None);
    assert_eq!(state(&app), ViewState::Exploring);
}

#[test]
fn back_returns_to_overview_and_flattens_depth_exactly() {
    let mut app = scenario_app();
    explore_big_dipper(&mut app);
    let (dubhe, position) = star(&mut app, "Dubhe");
    click_on(&mut app, position);

    app.world_mut().write_message(ViewCommand::Back);
    step(&mut app, FRAME_MS);
    assert_eq!(state(&app), ViewState::Transitioning);
    assert_eq!(selection(&app), None);
    let hidden = presentation(&app);
    assert_eq!(hidden.info_panel, None);
    assert_eq!(hidden.star_popup, None);
    assert!(!hidden.return_visible);

    step(&mut app, 1500);
    assert_eq!(state(&app), ViewState::Overview);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(0.0, 0.0, 100.0));
    assert!(presentation(&app).overview_header_visible);

    step(&mut app, 1000);
    assert_eq!(star_depth(&app, dubhe), 0.0);
    let (cassiopeia_star, _) = star(&mut app, "Segin");
    assert_eq!(star_depth(&app, cassiopeia_star), 0.0);
}

#[test]
fn clicks_during_a_transition_are_ignored() {
    let mut app = scenario_app();
    let (_, alkaid) = star(&mut app, "Alkaid");
    let (_, schedar) = star(&mut app, "Schedar");
    click_on(&mut app, alkaid);

    let stale_pointer = pointer_for(&mut app, schedar);
    let stale_ray = ray_toward(&mut app, schedar);
    click_at(&mut app, stale_pointer, stale_ray);
    step(&mut app, 1500);

    assert_eq!(state(&app), ViewState::Exploring);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(-75.0, -20.0, 35.0));
}

#[test]
fn back_in_overview_and_explore_while_exploring_are_no_ops() {
    let mut app = scenario_app();
    app.world_mut().write_message(ViewCommand::Back);
    step(&mut app, FRAME_MS);
    assert_eq!(state(&app), ViewState::Overview);

    explore_big_dipper(&mut app);
    let cassiopeia = group(&mut app, "Cassiopeia");
    app.world_mut().write_message(ViewCommand::Explore(cassiopeia));
    step(&mut app, 1500);
    assert_eq!(state(&app), ViewState::Exploring);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(-75.0, -20.0, 35.0));
}

#[test]
fn orion_has_no_depth_profile_and_keeps_its_layout() {
    let mut app = scenario_app();
    let (betelgeuse, position) = star(&mut app, "Betelgeuse");
    let depth = star_depth(&app, betelgeuse);

    click_on(&mut app, position);
    step(&mut app, 1500);
    step(&mut app, 1000);

    assert_eq!(state(&app), ViewState::Exploring);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(0.0, 0.0, 35.0));
    assert_eq!(star_depth(&app, betelgeuse), depth);
}

#[test]
fn a_group_losing_a_star_does_not_stall_other_animations() {
    let mut app = scenario_app();
    explore_big_dipper(&mut app);
    let big_dipper = group(&mut app, "Big Dipper");
    let cassiopeia = group(&mut app, "Cassiopeia");
    app.world_mut().write_message(MorphRequested {
        group: cassiopeia,
        to_extended: true,
    });
    step(&mut app, FRAME_MS);
    step(&mut app, 1000);
    let cassiopeia_stars = group_stars(&mut app, "Cassiopeia");
    assert!(cassiopeia_stars.iter().any(|star| star_depth(&app, *star) != 0.0));

    app.world_mut().write_message(ViewCommand::Back);
    step(&mut app, FRAME_MS);
    step(&mut app, 1500);
    assert_eq!(state(&app), ViewState::Overview);

    let (alkaid, _) = star(&mut app, "Alkaid");
    let (dubhe, _) = star(&mut app, "Dubhe");
    app.world_mut().despawn(alkaid);
    app.world_mut()
        .get_mut::<Transform>(dubhe)
        .expect("dubhe")
        .translation
        .z = 4.0;
    let orion = group(&mut app, "Orion");
    app.world_mut().write_message(ViewCommand::Explore(orion));
    step(&mut app, FRAME_MS);

    assert_eq!(state(&app), ViewState::Transitioning);
    assert!(app
        .world()
        .get::<DepthMorphSlot>(big_dipper)
        .is_some_and(|slot| slot.0.is_none()));
    let world = app.world_mut();
    let mut lines = world.query::<&ConnectorLine>();
    let dubhe_ends: Vec<f32> = lines
        .iter(world)
        .filter_map(|line| {
            if line.from == dubhe {
                Some(line.start.z)
            } else if line.to == dubhe {
                Some(line.end.z)
            } else {
                None
            }
        })
        .collect();
    assert_eq!(dubhe_ends, vec![4.0, 4.0]);

    step(&mut app, 1000);
    for star in &cassiopeia_stars {
        assert_eq!(star_depth(&app, *star), 0.0);
    }

    step(&mut app, 500);
    assert_eq!(state(&app), ViewState::Exploring);
    assert_eq!(camera_transform(&mut app).translation, Vec3::new(0.0, 0.0, 35.0));
}
