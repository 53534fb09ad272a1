use std::time::Duration;

use bevy::prelude::Vec3;

use super::animator::{lerp_vec3, AnimationTask, TaskStatus, CAMERA_MOVE_DURATION};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub(super) fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// A camera move from one pose to another. `landing` is handed back when the
/// move reaches progress 1.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct CameraFlight<L> {
    task: AnimationTask,
    from: CameraPose,
    to: CameraPose,
    landing: L,
}

impl<L> CameraFlight<L> {
    pub(super) fn new(from: CameraPose, to: CameraPose, landing: L) -> Self {
        Self::with_duration(from, to, landing, CAMERA_MOVE_DURATION)
    }

    pub(super) fn with_duration(
        from: CameraPose,
        to: CameraPose,
        landing: L,
        duration: Duration,
    ) -> Self {
        Self {
            task: AnimationTask::new(duration),
            from,
            to,
            landing,
        }
    }

    pub(super) fn destination(&self) -> CameraPose {
        self.to
    }
}

fn pose_between(from: CameraPose, to: CameraPose, progress: f32) -> CameraPose {
    CameraPose {
        position: lerp_vec3(from.position, to.position, progress),
        look_at: lerp_vec3(from.look_at, to.look_at, progress),
    }
}

/// Holds at most one camera flight. Starting a flight replaces the previous
/// one, which then never reports its landing.
#[derive(Clone, Debug)]
pub(super) struct FlightSlot<L> {
    active: Option<CameraFlight<L>>,
}

impl<L> Default for FlightSlot<L> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<L> FlightSlot<L> {
    /// Returns the superseded flight, if one was in progress.
    pub(super) fn start(&mut self, flight: CameraFlight<L>) -> Option<CameraFlight<L>> {
        self.active.replace(flight)
    }

    /// Applies this tick's pose and returns the landing on the completing tick.
    pub(super) fn advance<F>(&mut self, now: Duration, mut apply: F) -> Option<L>
    where
        F: FnMut(CameraPose),
    {
        let flight = self.active.as_mut()?;
        let (from, to) = (flight.from, flight.to);
        let status = flight
            .task
            .advance(now, |progress| apply(pose_between(from, to, progress)));
        match status {
            TaskStatus::Running => None,
            TaskStatus::Completed | TaskStatus::Idle => {
                self.active.take().map(|flight| flight.landing)
            }
        }
    }
}
