use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use bevy::prelude::{Entity, Vec3};

pub(super) const CAMERA_MOVE_DURATION: Duration = Duration::from_millis(1500);
pub(super) const DEPTH_MORPH_DURATION: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TaskStatus {
    Running,
    /// Returned once, on the tick that reached progress 1.
    Completed,
    /// The task completed on an earlier tick; nothing was invoked.
    Idle,
}

/// One time-driven interpolation. The start time is captured on the first
/// tick the task receives, so a task created mid-frame starts at progress 0.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct AnimationTask {
    duration: Duration,
    started_at: Option<Duration>,
    last_progress: f32,
    done: bool,
}

impl AnimationTask {
    pub(super) fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
            last_progress: 0.0,
            done: false,
        }
    }

    pub(super) fn advance<F>(&mut self, now: Duration, mut on_progress: F) -> TaskStatus
    where
        F: FnMut(f32),
    {
        let result: Result<TaskStatus, Infallible> = self.try_advance(now, |progress| {
            on_progress(progress);
            Ok(())
        });
        match result {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }

    /// Like [`AnimationTask::advance`], but a failing consumer leaves the task
    /// incomplete so the caller can drop it without firing completion.
    pub(super) fn try_advance<F, E>(&mut self, now: Duration, mut on_progress: F) -> Result<TaskStatus, E>
    where
        F: FnMut(f32) -> Result<(), E>,
    {
        if self.done {
            return Ok(TaskStatus::Idle);
        }

        let started_at = *self.started_at.get_or_insert(now);
        let progress =
            linear_progress(now.saturating_sub(started_at), self.duration).max(self.last_progress);
        on_progress(progress)?;
        self.last_progress = progress;

        if progress >= 1.0 {
            self.done = true;
            Ok(TaskStatus::Completed)
        } else {
            Ok(TaskStatus::Running)
        }
    }
}

pub(super) fn linear_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Linear interpolation that lands exactly on `end` at progress 1.
pub(super) fn lerp_f32(start: f32, end: f32, progress: f32) -> f32 {
    if progress >= 1.0 {
        end
    } else {
        start + (end - start) * progress
    }
}

pub(super) fn lerp_vec3(start: Vec3, end: Vec3, progress: f32) -> Vec3 {
    if progress >= 1.0 {
        end
    } else {
        start + (end - start) * progress
    }
}

/// Why a running task could not apply a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum AnimationError {
    MissingStar { group: Entity, index: usize },
    ProfileMismatch { group: Entity, stars: usize, depths: usize },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::MissingStar { group, index } => {
                write!(f, "star #{index} of group {group} no longer exists")
            }
            AnimationError::ProfileMismatch {
                group,
                stars,
                depths,
            } => write!(
                f,
                "group {group} has {stars} stars but a depth profile of {depths} values"
            ),
        }
    }
}

impl Error for AnimationError {}
