//! Static catalog of star groups consumed read-only by the viewer.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::CatalogPos;

/// Index pair into a group's star list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSpec {
    pub name: String,
    /// Flat-layout position relative to the owning group.
    pub pos: CatalogPos,
    /// Depth coordinate of the extended (3-D) layout, when the star declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_depth: Option<f32>,
    /// Apparent magnitude.
    pub brightness: f32,
    pub distance: String,
}

impl StarSpec {
    pub fn new(name: &str, pos: CatalogPos, brightness: f32, distance: &str) -> Self {
        Self {
            name: name.to_string(),
            pos,
            extended_depth: None,
            brightness,
            distance: distance.to_string(),
        }
    }

    pub fn with_extended_depth(mut self, depth: f32) -> Self {
        self.extended_depth = Some(depth);
        self
    }
}

/// Shimmer curve: `shimmer = sin(t * speed + x * phase_scale) * amplitude + bias`,
/// `scale = scale_base + shimmer * scale_gain`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShimmerStyle {
    pub speed: f32,
    pub phase_scale: f32,
    pub amplitude: f32,
    pub bias: f32,
    pub scale_base: f32,
    pub scale_gain: f32,
}

impl ShimmerStyle {
    pub fn intensity(&self, elapsed_secs: f32, x: f32) -> f32 {
        (elapsed_secs * self.speed + x * self.phase_scale).sin() * self.amplitude + self.bias
    }

    pub fn scale_for(&self, intensity: f32) -> f32 {
        self.scale_base + intensity * self.scale_gain
    }
}

/// Per-group look. Colors are `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub star_color: u32,
    pub star_emissive: u32,
    pub shininess: f32,
    pub line_color: u32,
    pub line_opacity: f32,
    pub shimmer: ShimmerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub info: String,
    pub position: CatalogPos,
    pub stars: Vec<StarSpec>,
    pub connections: Vec<Connection>,
    pub style: GroupStyle,
}

impl GroupSpec {
    /// A group morphs between layouts only if some star declares an extended depth.
    pub fn has_depth_profile(&self) -> bool {
        self.stars.iter().any(|star| star.extended_depth.is_some())
    }

    /// Extended depth per star, in star order. Stars without one flatten to 0.
    pub fn depth_profile(&self) -> Option<Vec<f32>> {
        if !self.has_depth_profile() {
            return None;
        }
        Some(
            self.stars
                .iter()
                .map(|star| star.extended_depth.unwrap_or(0.0))
                .collect(),
        )
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.stars.is_empty() {
            return Err(CatalogError::EmptyGroup {
                group: self.name.clone(),
            });
        }
        if !self.position.is_finite() {
            return Err(CatalogError::NonFiniteCoordinate {
                group: self.name.clone(),
                star: None,
            });
        }
        for star in &self.stars {
            let depth_finite = star.extended_depth.map(f32::is_finite).unwrap_or(true);
            if !star.pos.is_finite() || !depth_finite {
                return Err(CatalogError::NonFiniteCoordinate {
                    group: self.name.clone(),
                    star: Some(star.name.clone()),
                });
            }
        }
        let star_count = self.stars.len();
        for (connection_index, connection) in self.connections.iter().enumerate() {
            for index in [connection.0, connection.1] {
                if index >= star_count {
                    return Err(CatalogError::ConnectionOutOfRange {
                        group: self.name.clone(),
                        connection: connection_index,
                        index,
                        star_count,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub groups: Vec<GroupSpec>,
}

impl Catalog {
    pub fn new(groups: Vec<GroupSpec>) -> Self {
        Self { groups }
    }

    pub fn group(&self, name: &str) -> Option<&GroupSpec> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn star_count(&self) -> usize {
        self.groups.iter().map(|group| group.stars.len()).sum()
    }

    /// Rejects data the viewer cannot animate safely. Must pass before a scene is built.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                return Err(CatalogError::DuplicateGroupName {
                    group: group.name.clone(),
                });
            }
            group.validate()?;
        }
        Ok(())
    }
}

/// Catalog integrity faults detected at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    EmptyGroup {
        group: String,
    },
    DuplicateGroupName {
        group: String,
    },
    ConnectionOutOfRange {
        group: String,
        connection: usize,
        index: usize,
        star_count: usize,
    },
    NonFiniteCoordinate {
        group: String,
        star: Option<String>,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::EmptyGroup { group } => write!(f, "group {group} has no stars"),
            CatalogError::DuplicateGroupName { group } => {
                write!(f, "group name {group} appears more than once")
            }
            CatalogError::ConnectionOutOfRange {
                group,
                connection,
                index,
                star_count,
            } => write!(
                f,
                "group {group} connection #{connection} references star {index}, but only {star_count} stars exist"
            ),
            CatalogError::NonFiniteCoordinate { group, star } => match star {
                Some(star) => write!(f, "group {group} star {star} has a non-finite coordinate"),
                None => write!(f, "group {group} has a non-finite position"),
            },
        }
    }
}

impl std::error::Error for CatalogError {}
