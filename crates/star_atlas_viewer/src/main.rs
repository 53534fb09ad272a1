use bevy::ecs::message::Message;
use bevy::prelude::*;
use star_atlas::{builtin_catalog, Catalog};

mod animator;
mod app_bootstrap;
mod camera_flight;
mod depth_morph;
mod free_look;
mod headless;
mod interaction;
mod line_follower;
mod picking;
mod presentation;
mod scene_setup;
mod selection;
mod shimmer;
mod view_state;
mod viewer_config;

#[cfg(test)]
mod test_fakes;
#[cfg(test)]
mod tests_scenarios;

use app_bootstrap::{run_headless, run_ui};
use presentation::StarDetails;
use viewer_config::{resolve_headless, resolve_viewer_config};

/// The validated catalog the scene is built from.
#[derive(Resource, Clone, Debug)]
struct AtlasCatalog(Catalog);

#[derive(Component)]
struct ViewerCamera;

#[derive(Component, Clone, Debug)]
struct GroupMarker {
    name: String,
    info: String,
    stars: Vec<Entity>,
    connectors: Vec<Entity>,
}

#[derive(Component, Clone, Debug)]
struct StarMarker {
    group: Entity,
    details: StarDetails,
}

/// UI-originated requests to the view controller.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
enum ViewCommand {
    Back,
    Explore(Entity),
}

fn main() {
    let catalog = builtin_catalog();
    if let Err(err) = catalog.validate() {
        eprintln!("star atlas: invalid catalog: {err}");
        std::process::exit(1);
    }

    let config = resolve_viewer_config();
    if resolve_headless() {
        run_headless(AtlasCatalog(catalog), config);
    } else {
        run_ui(AtlasCatalog(catalog), config);
    }
}
