use std::collections::HashMap;

use bevy::prelude::*;

const SEGMENT_EPSILON: f32 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PickableKind {
    Group,
    Star,
    Connector,
}

/// How a raw hit is turned into a pick target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ResolveMode {
    /// Walk owner links until a group is found.
    ClimbToGroup,
    /// Use the hit entity as-is.
    Raw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PickTarget {
    Nothing,
    Group(Entity),
    Star(Entity),
    /// A hit that is neither a group nor a star, e.g. a connector in raw mode.
    Other(Entity),
}

/// Entity -> owning group, built once when the scene is spawned.
#[derive(Resource, Default, Debug, Clone)]
pub(super) struct OwnerTable {
    kinds: HashMap<Entity, PickableKind>,
    owners: HashMap<Entity, Entity>,
}

impl OwnerTable {
    pub(super) fn register_group(&mut self, group: Entity) {
        self.kinds.insert(group, PickableKind::Group);
    }

    pub(super) fn register_member(&mut self, entity: Entity, kind: PickableKind, owner: Entity) {
        self.kinds.insert(entity, kind);
        self.owners.insert(entity, owner);
    }

    pub(super) fn kind(&self, entity: Entity) -> Option<PickableKind> {
        self.kinds.get(&entity).copied()
    }

    pub(super) fn owner(&self, entity: Entity) -> Option<Entity> {
        self.owners.get(&entity).copied()
    }

    /// Nearest group at or above `entity`; `None` once the owner chain runs out.
    pub(super) fn resolve_group(&self, entity: Entity) -> Option<Entity> {
        let mut current = entity;
        for _ in 0..=self.owners.len() {
            if self.kind(current) == Some(PickableKind::Group) {
                return Some(current);
            }
            current = self.owner(current)?;
        }
        None
    }

    pub(super) fn resolve(&self, hit: Option<Entity>, mode: ResolveMode) -> PickTarget {
        let Some(hit) = hit else {
            return PickTarget::Nothing;
        };
        match mode {
            ResolveMode::ClimbToGroup => self
                .resolve_group(hit)
                .map(PickTarget::Group)
                .unwrap_or(PickTarget::Nothing),
            ResolveMode::Raw => match self.kind(hit) {
                Some(PickableKind::Star) => PickTarget::Star(hit),
                Some(PickableKind::Group) => PickTarget::Group(hit),
                Some(PickableKind::Connector) | None => PickTarget::Other(hit),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum PickShape {
    Sphere { center: Vec3, radius: f32 },
    Segment { start: Vec3, end: Vec3, threshold: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct PickCandidate {
    pub entity: Entity,
    pub shape: PickShape,
}

/// Distance along the ray to the first surface point of the sphere in front of the origin.
pub(super) fn ray_sphere_distance(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let direction = *ray.direction;
    let offset = ray.origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Distance along the ray to its closest approach to the segment, when that
/// approach is within `threshold`.
pub(super) fn ray_segment_distance(ray: Ray3d, start: Vec3, end: Vec3, threshold: f32) -> Option<f32> {
    let direction = *ray.direction;
    let edge = end - start;
    let origin_offset = ray.origin - start;
    let edge_len_sq = edge.length_squared();
    let b = direction.dot(edge);
    let d = direction.dot(origin_offset);

    let along_ray = if edge_len_sq <= SEGMENT_EPSILON {
        (-d).max(0.0)
    } else {
        let e = edge.dot(origin_offset);
        let denom = edge_len_sq - b * b;
        let along_edge = if denom.abs() <= SEGMENT_EPSILON {
            (e / edge_len_sq).clamp(0.0, 1.0)
        } else {
            ((e - b * d) / denom).clamp(0.0, 1.0)
        };
        (along_edge * b - d).max(0.0)
    };
    let ray_point = ray.origin + direction * along_ray;
    let along_edge = if edge_len_sq <= SEGMENT_EPSILON {
        0.0
    } else {
        ((ray_point - start).dot(edge) / edge_len_sq).clamp(0.0, 1.0)
    };
    let segment_point = start + edge * along_edge;

    (ray_point.distance(segment_point) <= threshold).then_some(along_ray)
}

pub(super) fn hit_distance(ray: Ray3d, shape: PickShape) -> Option<f32> {
    match shape {
        PickShape::Sphere { center, radius } => ray_sphere_distance(ray, center, radius),
        PickShape::Segment {
            start,
            end,
            threshold,
        } => ray_segment_distance(ray, start, end, threshold),
    }
}

/// Nearest candidate by distance along the ray; earlier candidates win ties.
pub(super) fn nearest_hit<I>(ray: Ray3d, candidates: I) -> Option<(Entity, f32)>
where
    I: IntoIterator<Item = PickCandidate>,
{
    let mut best: Option<(Entity, f32)> = None;
    for candidate in candidates {
        let Some(distance) = hit_distance(ray, candidate.shape) else {
            continue;
        };
        if best
            .map(|(_, best_distance)| distance < best_distance)
            .unwrap_or(true)
        {
            best = Some((candidate.entity, distance));
        }
    }
    best
}

/// Pick ray to pick target.
pub(super) fn pick<I>(ray: Ray3d, candidates: I, mode: ResolveMode, owners: &OwnerTable) -> PickTarget
where
    I: IntoIterator<Item = PickCandidate>,
{
    let hit = nearest_hit(ray, candidates).map(|(entity, _)| entity);
    owners.resolve(hit, mode)
}
