use bevy::prelude::*;

use super::{GroupMarker, StarMarker};

/// A drawn connection between two stars of one group. Endpoints are
/// group-local and rewritten every frame from the stars' transforms.
#[derive(Component, Clone, Debug, PartialEq)]
pub(super) struct ConnectorLine {
    pub group: Entity,
    pub from: Entity,
    pub to: Entity,
    pub start: Vec3,
    pub end: Vec3,
}

impl ConnectorLine {
    pub(super) fn new(group: Entity, from: Entity, to: Entity) -> Self {
        Self {
            group,
            from,
            to,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
        }
    }
}

/// Places a unit segment running from the origin to +Z so it spans `start..end`.
pub(super) fn segment_transform(start: Vec3, end: Vec3) -> Transform {
    let span = end - start;
    let length = span.length();
    let rotation = span
        .try_normalize()
        .map(|direction| Quat::from_rotation_arc(Vec3::Z, direction))
        .unwrap_or(Quat::IDENTITY);
    Transform {
        translation: start,
        rotation,
        scale: Vec3::new(1.0, 1.0, length),
    }
}

/// Runs every frame for every group, after anything that moves stars.
pub(super) fn follow_connector_lines(
    groups: Query<&GroupMarker>,
    stars: Query<&Transform, (With<StarMarker>, Without<ConnectorLine>)>,
    mut lines: Query<(&mut ConnectorLine, &mut Transform), Without<StarMarker>>,
) {
    for group in &groups {
        for connector in &group.connectors {
            let Ok((mut line, mut transform)) = lines.get_mut(*connector) else {
                continue;
            };
            let (Ok(from), Ok(to)) = (stars.get(line.from), stars.get(line.to)) else {
                continue;
            };
            line.start = from.translation;
            line.end = to.translation;
            *transform = segment_transform(line.start, line.end);
        }
    }
}
