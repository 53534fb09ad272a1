use std::time::Duration;

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

use super::animator::{lerp_f32, AnimationError, AnimationTask, TaskStatus, DEPTH_MORPH_DURATION};
use super::{GroupMarker, StarMarker};

/// Extended depth per star, in group star order.
#[derive(Component, Clone, Debug, PartialEq)]
pub(super) struct DepthProfile(pub Vec<f32>);

/// Flat <-> extended transition of one group's star depths.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct DepthMorph {
    task: AnimationTask,
    start: Vec<f32>,
    target: Vec<f32>,
}

impl DepthMorph {
    /// `None` when there is nothing to move.
    pub(super) fn plan(current: &[f32], profile: &DepthProfile, to_extended: bool) -> Option<Self> {
        if current.is_empty() {
            return None;
        }
        let target = if to_extended {
            (0..current.len())
                .map(|index| profile.0.get(index).copied().unwrap_or(0.0))
                .collect()
        } else {
            vec![0.0; current.len()]
        };
        Some(Self {
            task: AnimationTask::new(DEPTH_MORPH_DURATION),
            start: current.to_vec(),
            target,
        })
    }

    /// Hands every star its depth for this tick; stops at the first failure.
    pub(super) fn advance<F>(&mut self, now: Duration, mut apply: F) -> Result<TaskStatus, AnimationError>
    where
        F: FnMut(usize, f32) -> Result<(), AnimationError>,
    {
        let start = &self.start;
        let target = &self.target;
        self.task.try_advance(now, |progress| {
            for (index, (from, to)) in start.iter().zip(target).enumerate() {
                apply(index, lerp_f32(*from, *to, progress))?;
            }
            Ok(())
        })
    }
}

/// At most one depth morph per group; a new one replaces the running one.
#[derive(Component, Default, Debug)]
pub(super) struct DepthMorphSlot(pub Option<DepthMorph>);

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct MorphRequested {
    pub group: Entity,
    pub to_extended: bool,
}

pub(super) fn begin_depth_morphs(
    mut requests: MessageReader<MorphRequested>,
    mut groups: Query<(&GroupMarker, &DepthProfile, &mut DepthMorphSlot)>,
    stars: Query<&Transform, With<StarMarker>>,
) {
    for request in requests.read() {
        let Ok((marker, profile, mut slot)) = groups.get_mut(request.group) else {
            debug!("depth morph skipped: {} has no depth profile", request.group);
            continue;
        };
        if profile.0.len() != marker.stars.len() {
            let error = AnimationError::ProfileMismatch {
                group: request.group,
                stars: marker.stars.len(),
                depths: profile.0.len(),
            };
            warn!("depth morph for {} rejected: {error}", marker.name);
            continue;
        }

        let current: Vec<f32> = marker
            .stars
            .iter()
            .map(|star| stars.get(*star).map(|transform| transform.translation.z).unwrap_or(0.0))
            .collect();
        let Some(morph) = DepthMorph::plan(&current, profile, request.to_extended) else {
            continue;
        };
        if slot.0.replace(morph).is_some() {
            debug!("depth morph for {} replaced", marker.name);
        }
        debug!(
            "depth morph for {} started (extended: {})",
            marker.name, request.to_extended
        );
    }
}

pub(super) fn advance_depth_morphs(
    time: Res<Time>,
    mut groups: Query<(Entity, &GroupMarker, &mut DepthMorphSlot)>,
    mut stars: Query<&mut Transform, With<StarMarker>>,
) {
    let now = time.elapsed();
    for (group, marker, mut slot) in &mut groups {
        let Some(morph) = slot.0.as_mut() else {
            continue;
        };
        if let Some(index) = marker.stars.iter().position(|star| !stars.contains(*star)) {
            let error = AnimationError::MissingStar { group, index };
            warn!("depth morph for {} dropped: {error}", marker.name);
            slot.0 = None;
            continue;
        }
        let result = morph.advance(now, |index, depth| {
            let mut transform = marker
                .stars
                .get(index)
                .and_then(|star| stars.get_mut(*star).ok())
                .ok_or(AnimationError::MissingStar { group, index })?;
            transform.translation.z = depth;
            Ok(())
        });
        match result {
            Ok(TaskStatus::Running) => {}
            Ok(TaskStatus::Completed | TaskStatus::Idle) => {
                slot.0 = None;
            }
            Err(error) => {
                warn!("depth morph for {} dropped: {error}", marker.name);
                slot.0 = None;
            }
        }
    }
}
