use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::depth_morph::{advance_depth_morphs, begin_depth_morphs, DepthProfile, MorphRequested};
use super::free_look::{CameraRigMut, FreeLookCamera, OrbitDragState};
use super::line_follower::{follow_connector_lines, ConnectorLine};
use super::picking::{pick, OwnerTable, PickCandidate, PickShape, PickTarget};
use super::presentation::{PresentationState, UiPointerCapture};
use super::scene_setup::{setup_atlas_scene, STAR_RADIUS};
use super::shimmer::update_star_shimmer;
use super::view_state::{GroupFocus, MorphRequest, PickInput, ViewStateMachine};
use super::viewer_config::ViewerConfig;
use super::{GroupMarker, StarMarker, ViewCommand, ViewerCamera};

/// A primary-button press over the 3-D view: the window pixel it landed
/// on and the world ray cast through it.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub(super) struct PointerClick {
    pub position: Vec2,
    pub ray: Ray3d,
}

type CameraQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Transform, &'static mut FreeLookCamera),
    With<ViewerCamera>,
>;

type GroupQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static GroupMarker, &'static Transform, Has<DepthProfile>),
    Without<ViewerCamera>,
>;

/// Scene construction, the view controller and every per-frame animation
/// system, in the order one frame needs them. Window input is left to the
/// caller so the same plugin runs headless.
pub(super) struct ViewCorePlugin {
    config: ViewerConfig,
}

impl ViewCorePlugin {
    pub(super) fn new(config: ViewerConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ViewCorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config)
            .insert_resource(ViewStateMachine::new(
                self.config.overview_pose(),
                self.config.explore_offset_vec(),
            ))
            .init_resource::<OwnerTable>()
            .init_resource::<PresentationState>()
            .init_resource::<UiPointerCapture>()
            .init_resource::<OrbitDragState>()
            .add_message::<PointerClick>()
            .add_message::<ViewCommand>()
            .add_message::<MorphRequested>()
            .add_systems(Startup, setup_atlas_scene)
            .add_systems(
                Update,
                (
                    resolve_pointer_picks,
                    apply_view_commands,
                    advance_view_state,
                    begin_depth_morphs,
                    advance_depth_morphs,
                    follow_connector_lines,
                    update_star_shimmer,
                )
                    .chain(),
            );
    }
}

/// Read-only scene state a pick is resolved against. World positions come
/// from last frame's transform propagation, which is current while picks run
/// first in the frame.
#[derive(SystemParam)]
pub(super) struct PickScene<'w, 's> {
    config: Res<'w, ViewerConfig>,
    owners: Res<'w, OwnerTable>,
    groups: GroupQuery<'w, 's>,
    stars: Query<'w, 's, (Entity, &'static StarMarker, &'static GlobalTransform)>,
    connectors: Query<'w, 's, (Entity, &'static ConnectorLine)>,
}

impl PickScene<'_, '_> {
    /// World-space hit shapes for every star and connector.
    fn candidates(&self) -> Vec<PickCandidate> {
        let star_shapes = self.stars.iter().map(|(entity, _, transform)| PickCandidate {
            entity,
            shape: PickShape::Sphere {
                center: transform.translation(),
                radius: STAR_RADIUS * transform.scale().max_element(),
            },
        });
        let line_shapes = self.connectors.iter().filter_map(|(entity, line)| {
            let (Ok((_, _, from)), Ok((_, _, to))) =
                (self.stars.get(line.from), self.stars.get(line.to))
            else {
                return None;
            };
            Some(PickCandidate {
                entity,
                shape: PickShape::Segment {
                    start: from.translation(),
                    end: to.translation(),
                    threshold: self.config.line_pick_threshold,
                },
            })
        });
        star_shapes.chain(line_shapes).collect()
    }

    fn input_for(&self, target: PickTarget) -> PickInput {
        match target {
            PickTarget::Nothing => PickInput::Nothing,
            PickTarget::Group(entity) => self
                .groups
                .get(entity)
                .map(|(entity, marker, transform, has_profile)| {
                    PickInput::Group(group_focus(entity, marker, transform, has_profile))
                })
                .unwrap_or(PickInput::Nothing),
            PickTarget::Star(entity) => self
                .stars
                .get(entity)
                .map(|(entity, marker, _)| PickInput::Star {
                    entity,
                    details: marker.details.clone(),
                })
                .unwrap_or(PickInput::Nothing),
            PickTarget::Other(_) => PickInput::Other,
        }
    }
}

pub(super) fn emit_pointer_clicks(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewerCamera>>,
    buttons: Res<ButtonInput<MouseButton>>,
    capture: Res<UiPointerCapture>,
    mut clicks: MessageWriter<PointerClick>,
) {
    if !buttons.just_pressed(MouseButton::Left) || capture.over_ui {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(position) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, position) else {
        return;
    };
    clicks.write(PointerClick { position, ray });
}

pub(super) fn handle_back_hotkey(keys: Res<ButtonInput<KeyCode>>, mut commands: MessageWriter<ViewCommand>) {
    if keys.just_pressed(KeyCode::Escape) {
        commands.write(ViewCommand::Back);
    }
}

pub(super) fn resolve_pointer_picks(
    mut clicks: MessageReader<PointerClick>,
    scene: PickScene,
    mut machine: ResMut<ViewStateMachine>,
    mut presentation: ResMut<PresentationState>,
    mut cameras: CameraQuery,
) {
    for click in clicks.read() {
        let Some(mode) = machine.resolve_mode() else {
            debug!("click at {:?} ignored while transitioning", click.position);
            continue;
        };
        let Ok((mut transform, mut free_look)) = cameras.single_mut() else {
            return;
        };

        let target = pick(click.ray, scene.candidates(), mode, &scene.owners);
        debug!("click at {:?} resolved to {target:?}", click.position);

        let mut rig = CameraRigMut {
            transform: &mut transform,
            free_look: &mut free_look,
        };
        machine.handle_pick(scene.input_for(target), click.position, &mut rig, &mut *presentation);
    }
}

pub(super) fn apply_view_commands(
    mut commands: MessageReader<ViewCommand>,
    mut machine: ResMut<ViewStateMachine>,
    mut presentation: ResMut<PresentationState>,
    mut cameras: CameraQuery,
    groups: GroupQuery,
) {
    for command in commands.read() {
        let Ok((mut transform, mut free_look)) = cameras.single_mut() else {
            return;
        };
        let mut rig = CameraRigMut {
            transform: &mut transform,
            free_look: &mut free_look,
        };
        match *command {
            ViewCommand::Back => {
                machine.request_back(&mut rig, &mut *presentation);
            }
            ViewCommand::Explore(group) => {
                let Ok((entity, marker, transform, has_profile)) = groups.get(group) else {
                    warn!("explore command for unknown group {group}");
                    continue;
                };
                let focus = group_focus(entity, marker, transform, has_profile);
                machine.request_explore(focus, &mut rig, &mut *presentation);
            }
        }
    }
}

pub(super) fn advance_view_state(
    time: Res<Time>,
    mut machine: ResMut<ViewStateMachine>,
    mut presentation: ResMut<PresentationState>,
    mut cameras: CameraQuery,
    profiled_groups: Query<Entity, With<DepthProfile>>,
    mut morphs: MessageWriter<MorphRequested>,
) {
    let Ok((mut transform, mut free_look)) = cameras.single_mut() else {
        return;
    };
    let mut rig = CameraRigMut {
        transform: &mut transform,
        free_look: &mut free_look,
    };
    match machine.advance(time.elapsed(), &mut rig, &mut *presentation) {
        Some(MorphRequest::Extend(group)) => {
            morphs.write(MorphRequested {
                group,
                to_extended: true,
            });
        }
        Some(MorphRequest::FlattenAll) => {
            morphs.write_batch(profiled_groups.iter().map(|group| MorphRequested {
                group,
                to_extended: false,
            }));
        }
        None => {}
    }
}

fn group_focus(entity: Entity, marker: &GroupMarker, transform: &Transform, has_profile: bool) -> GroupFocus {
    GroupFocus {
        entity,
        name: marker.name.clone(),
        info: marker.info.clone(),
        position: transform.translation,
        has_depth_profile: has_profile,
    }
}
