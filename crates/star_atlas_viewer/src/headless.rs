use std::time::Duration;

use bevy::app::AppExit;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use serde::Serialize;

use super::view_state::{ViewState, ViewStateMachine};
use super::{AtlasCatalog, GroupMarker, ViewCommand};

const TOUR_DWELL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TourStep {
    Explore(usize),
    Back(usize),
    Done,
}

/// Scripted walk through every group: explore, dwell, back, dwell.
#[derive(Resource, Debug)]
pub(super) struct HeadlessTour {
    step: TourStep,
    settled_at: Option<Duration>,
    last_reported: Option<ViewState>,
}

impl Default for HeadlessTour {
    fn default() -> Self {
        Self {
            step: TourStep::Explore(0),
            settled_at: None,
            last_reported: None,
        }
    }
}

impl HeadlessTour {
    /// Next command once the current state has been stable for the dwell time.
    fn next_command(&mut self, now: Duration, state: ViewState, groups: &[Entity]) -> Option<ViewCommand> {
        if state == ViewState::Transitioning {
            self.settled_at = None;
            return None;
        }
        let settled_at = *self.settled_at.get_or_insert(now);
        if now.saturating_sub(settled_at) < TOUR_DWELL {
            return None;
        }

        match (self.step, state) {
            (TourStep::Explore(index), ViewState::Overview) => match groups.get(index) {
                Some(group) => {
                    self.step = TourStep::Back(index);
                    self.settled_at = None;
                    Some(ViewCommand::Explore(*group))
                }
                None => {
                    self.step = TourStep::Done;
                    None
                }
            },
            (TourStep::Back(index), ViewState::Exploring) => {
                self.step = TourStep::Explore(index + 1);
                self.settled_at = None;
                Some(ViewCommand::Back)
            }
            _ => None,
        }
    }

    fn is_done(&self) -> bool {
        self.step == TourStep::Done
    }
}

/// One JSON line per observed state change.
#[derive(Debug, Serialize)]
pub(super) struct ViewStateReport {
    pub elapsed_ms: u128,
    pub state: ViewState,
    pub group: Option<String>,
    pub selection: bool,
}

impl ViewStateReport {
    pub(super) fn capture(elapsed: Duration, machine: &ViewStateMachine) -> Self {
        Self {
            elapsed_ms: elapsed.as_millis(),
            state: machine.state(),
            group: machine.focus().map(|focus| focus.name.clone()),
            selection: machine.selection().is_some(),
        }
    }
}

/// Group roots in catalog order.
fn ordered_groups(catalog: &AtlasCatalog, groups: &Query<(Entity, &GroupMarker)>) -> Vec<Entity> {
    catalog
        .0
        .groups
        .iter()
        .filter_map(|spec| {
            groups
                .iter()
                .find(|(_, marker)| marker.name == spec.name)
                .map(|(entity, _)| entity)
        })
        .collect()
}

pub(super) fn drive_headless_tour(
    time: Res<Time>,
    catalog: Res<AtlasCatalog>,
    machine: Res<ViewStateMachine>,
    groups: Query<(Entity, &GroupMarker)>,
    mut tour: ResMut<HeadlessTour>,
    mut commands: MessageWriter<ViewCommand>,
    mut exit: MessageWriter<AppExit>,
) {
    let now = time.elapsed();
    let ordered = ordered_groups(&catalog, &groups);
    if let Some(command) = tour.next_command(now, machine.state(), &ordered) {
        info!("headless tour: {command:?}");
        commands.write(command);
    }
    if tour.is_done() {
        info!("headless tour finished");
        exit.write(AppExit::Success);
    }
}

pub(super) fn headless_report(
    time: Res<Time>,
    machine: Res<ViewStateMachine>,
    mut tour: ResMut<HeadlessTour>,
) {
    if tour.last_reported == Some(machine.state()) {
        return;
    }
    tour.last_reported = Some(machine.state());
    let report = ViewStateReport::capture(time.elapsed(), &machine);
    match serde_json::to_string(&report) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!("headless report not serializable: {err}"),
    }
}
