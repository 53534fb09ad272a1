//! Overview/Exploring controller.
//!
//! The machine owns the current [`ViewState`], the star selection and the
//! single camera-flight slot. Callers drive it through three inputs: resolved
//! picks, the "back" trigger, and the per-frame [`ViewStateMachine::advance`].
//! Side effects leave through the [`CameraRig`] and [`PresentationSink`]
//! seams; depth morphs are handed back as [`MorphRequest`]s because they act
//! on scene entities the machine does not own.

use std::time::Duration;

use bevy::prelude::*;
use serde::Serialize;

use super::camera_flight::{CameraFlight, CameraPose, FlightSlot};
use super::picking::ResolveMode;
use super::presentation::{PresentationSink, StarDetails};
use super::selection::{Selection, SelectionChange};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum ViewState {
    #[default]
    Overview,
    Transitioning,
    Exploring,
}

/// Camera and navigation control of the host engine.
pub(super) trait CameraRig {
    fn position(&self) -> Vec3;
    fn set_pose(&mut self, pose: CameraPose);
    fn set_free_look_enabled(&mut self, enabled: bool);
    fn free_look_target(&self) -> Vec3;
    fn set_free_look_target(&mut self, target: Vec3);
}

/// A group as the controller needs to know it.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct GroupFocus {
    pub entity: Entity,
    pub name: String,
    pub info: String,
    pub position: Vec3,
    pub has_depth_profile: bool,
}

/// A resolved pick, enriched with whatever the current mode needs.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum PickInput {
    Nothing,
    Group(GroupFocus),
    Star { entity: Entity, details: StarDetails },
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PickResponse {
    /// Picking is gated while a transition is in flight.
    Ignored,
    ExploreStarted(Entity),
    Selection(SelectionChange),
    NoOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MorphRequest {
    Extend(Entity),
    FlattenAll,
}

#[derive(Clone, Debug, PartialEq)]
enum Landing {
    Exploring(GroupFocus),
    Overview,
}

#[derive(Resource, Debug)]
pub(super) struct ViewStateMachine {
    state: ViewState,
    selection: Selection,
    overview: CameraPose,
    explore_offset: Vec3,
    focus: Option<GroupFocus>,
    flight: FlightSlot<Landing>,
}

impl ViewStateMachine {
    pub(super) fn new(overview: CameraPose, explore_offset: Vec3) -> Self {
        Self {
            state: ViewState::Overview,
            selection: Selection::default(),
            overview,
            explore_offset,
            focus: None,
            flight: FlightSlot::default(),
        }
    }

    pub(super) fn state(&self) -> ViewState {
        self.state
    }

    pub(super) fn selection(&self) -> Option<Entity> {
        self.selection.current()
    }

    pub(super) fn focus(&self) -> Option<&GroupFocus> {
        self.focus.as_ref()
    }

    /// Camera pose a flight into `group` ends at.
    pub(super) fn explore_pose(&self, group_position: Vec3) -> CameraPose {
        CameraPose::new(group_position + self.explore_offset, group_position)
    }

    /// How raw hits are resolved in the current state; `None` while transitioning.
    pub(super) fn resolve_mode(&self) -> Option<ResolveMode> {
        match self.state {
            ViewState::Overview => Some(ResolveMode::ClimbToGroup),
            ViewState::Exploring => Some(ResolveMode::Raw),
            ViewState::Transitioning => None,
        }
    }

    pub(super) fn handle_pick<R, S>(
        &mut self,
        input: PickInput,
        pointer: Vec2,
        rig: &mut R,
        sink: &mut S,
    ) -> PickResponse
    where
        R: CameraRig + ?Sized,
        S: PresentationSink + ?Sized,
    {
        if self.state == ViewState::Transitioning {
            return PickResponse::Ignored;
        }

        match (self.state, input) {
            (_, PickInput::Nothing) => {
                PickResponse::Selection(self.selection.on_pick(None, pointer, sink))
            }
            (ViewState::Overview, PickInput::Group(group)) => {
                let entity = group.entity;
                if self.request_explore(group, rig, sink) {
                    PickResponse::ExploreStarted(entity)
                } else {
                    PickResponse::NoOp
                }
            }
            (ViewState::Exploring, PickInput::Star { entity, details }) => PickResponse::Selection(
                self.selection
                    .on_pick(Some((entity, &details)), pointer, sink),
            ),
            _ => PickResponse::NoOp,
        }
    }

    /// Overview -> Transitioning, flying toward `group`. No-op in any other state.
    pub(super) fn request_explore<R, S>(&mut self, group: GroupFocus, rig: &mut R, sink: &mut S) -> bool
    where
        R: CameraRig + ?Sized,
        S: PresentationSink + ?Sized,
    {
        if self.state != ViewState::Overview {
            debug!("explore request for {} dropped in {:?}", group.name, self.state);
            return false;
        }

        sink.set_overview_header_visible(false);
        rig.set_free_look_target(group.position);
        let from = CameraPose::new(rig.position(), group.position);
        let to = self.explore_pose(group.position);
        info!("flying to {} at {:?}", group.name, to.position);
        self.start_flight(CameraFlight::new(from, to, Landing::Exploring(group)));
        true
    }

    /// Exploring -> Transitioning, flying back to the overview. Dropped in any other state.
    pub(super) fn request_back<R, S>(&mut self, rig: &mut R, sink: &mut S) -> bool
    where
        R: CameraRig + ?Sized,
        S: PresentationSink + ?Sized,
    {
        if self.state != ViewState::Exploring {
            debug!("back request dropped in {:?}", self.state);
            return false;
        }

        rig.set_free_look_enabled(false);
        sink.hide_info_panel();
        sink.set_return_visible(false);
        self.selection.clear(sink);
        self.focus = None;

        let from = CameraPose::new(rig.position(), rig.free_look_target());
        info!("returning to overview");
        self.start_flight(CameraFlight::new(from, self.overview, Landing::Overview));
        true
    }

    /// Advances the camera flight, if any. Returns the depth morph to start
    /// when the flight lands.
    pub(super) fn advance<R, S>(&mut self, now: Duration, rig: &mut R, sink: &mut S) -> Option<MorphRequest>
    where
        R: CameraRig + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let landing = self.flight.advance(now, |pose| rig.set_pose(pose))?;
        match landing {
            Landing::Exploring(group) => {
                rig.set_free_look_enabled(true);
                rig.set_free_look_target(group.position);
                sink.show_info_panel(&group.name, &group.info);
                sink.set_return_visible(true);
                self.state = ViewState::Exploring;
                info!("exploring {}", group.name);
                let request = group
                    .has_depth_profile
                    .then_some(MorphRequest::Extend(group.entity));
                self.focus = Some(group);
                request
            }
            Landing::Overview => {
                sink.set_overview_header_visible(true);
                rig.set_free_look_target(self.overview.look_at);
                self.state = ViewState::Overview;
                info!("overview restored");
                Some(MorphRequest::FlattenAll)
            }
        }
    }

    fn start_flight(&mut self, flight: CameraFlight<Landing>) {
        if let Some(superseded) = self.flight.start(flight) {
            debug!("camera flight toward {:?} superseded", superseded.destination().position);
        }
        self.state = ViewState::Transitioning;
    }
}
