use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use star_atlas::{CatalogPos, Connection, GroupSpec, GroupStyle};

use super::depth_morph::{DepthMorphSlot, DepthProfile};
use super::free_look::FreeLookCamera;
use super::line_follower::{segment_transform, ConnectorLine};
use super::picking::{OwnerTable, PickableKind};
use super::presentation::StarDetails;
use super::shimmer::StarShimmer;
use super::viewer_config::ViewerConfig;
use super::{AtlasCatalog, GroupMarker, StarMarker, ViewerCamera};

pub(super) const STAR_RADIUS: f32 = 0.4;
const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 2000.0;
const CONNECTOR_WIDTH: f32 = 0.06;
const STARFIELD_EXTENT: f32 = 2000.0;
const STARFIELD_SEED: u64 = 0x5354_4152;
const AMBIENT_BRIGHTNESS: f32 = 120.0;
const CAMERA_LIGHT_INTENSITY: f32 = 4_000_000.0;

/// Shared meshes plus the material store, present only when rendering.
pub(super) struct GroupRenderAssets<'a> {
    pub materials: &'a mut Assets<StandardMaterial>,
    pub star_mesh: Handle<Mesh>,
    pub connector_mesh: Handle<Mesh>,
}

pub(super) fn setup_atlas_scene(
    mut commands: Commands,
    catalog: Res<AtlasCatalog>,
    config: Res<ViewerConfig>,
    mut owners: ResMut<OwnerTable>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let mut render = match (meshes.as_deref_mut(), materials.as_deref_mut()) {
        (Some(meshes), Some(materials)) => Some(GroupRenderAssets {
            star_mesh: meshes.add(Sphere::new(STAR_RADIUS).mesh().uv(16, 12)),
            connector_mesh: meshes.add(connector_mesh()),
            materials,
        }),
        _ => None,
    };

    for group in &catalog.0.groups {
        spawn_group(&mut commands, &mut owners, group, render.as_mut());
    }

    let rendered = render.is_some();
    spawn_viewer_camera(&mut commands, &config, rendered);

    if let (Some(meshes), Some(materials)) = (meshes.as_deref_mut(), materials.as_deref_mut()) {
        if config.starfield_count > 0 {
            let positions = starfield_positions(config.starfield_count, STARFIELD_SEED);
            commands.spawn((
                Name::new("starfield"),
                Mesh3d(meshes.add(starfield_mesh(positions))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::WHITE,
                    unlit: true,
                    ..default()
                })),
                Transform::default(),
            ));
        }
        commands.insert_resource(GlobalAmbientLight {
            color: color_from_hex(0x404040),
            brightness: AMBIENT_BRIGHTNESS,
            affects_lightmapped_meshes: true,
        });
    }

    info!(
        "scene ready: {} groups, {} stars, rendering: {rendered}",
        catalog.0.groups.len(),
        catalog.0.star_count()
    );
}

/// Builds one group: a translated root, its stars and its connectors as
/// children, all registered in the owner table.
pub(super) fn spawn_group(
    commands: &mut Commands,
    owners: &mut OwnerTable,
    spec: &GroupSpec,
    mut render: Option<&mut GroupRenderAssets>,
) -> Entity {
    let root = commands
        .spawn((
            Name::new(spec.name.clone()),
            Transform::from_translation(to_vec3(spec.position)),
            Visibility::default(),
            DepthMorphSlot::default(),
        ))
        .id();
    owners.register_group(root);

    let base_emissive = color_from_hex(spec.style.star_emissive).to_linear();
    let mut stars = Vec::with_capacity(spec.stars.len());
    for star in &spec.stars {
        let mut entity = commands.spawn((
            Name::new(star.name.clone()),
            StarMarker {
                group: root,
                details: StarDetails {
                    name: star.name.clone(),
                    brightness: star.brightness,
                    distance: star.distance.clone(),
                },
            },
            StarShimmer {
                style: spec.style.shimmer,
                base_emissive,
            },
            Transform::from_translation(to_vec3(star.pos)),
            ChildOf(root),
        ));
        if let Some(render) = render.as_deref_mut() {
            let material = render.materials.add(star_material(&spec.style));
            entity.insert((Mesh3d(render.star_mesh.clone()), MeshMaterial3d(material)));
        }
        let star_entity = entity.id();
        owners.register_member(star_entity, PickableKind::Star, root);
        stars.push(star_entity);
    }

    let line_material = render
        .as_deref_mut()
        .map(|render| render.materials.add(line_material(&spec.style)));
    let mut connectors = Vec::with_capacity(spec.connections.len());
    for &Connection(a, b) in &spec.connections {
        let (Some(&from), Some(&to), Some(start), Some(end)) = (
            stars.get(a),
            stars.get(b),
            spec.stars.get(a),
            spec.stars.get(b),
        ) else {
            warn!("{}: connection ({a}, {b}) skipped", spec.name);
            continue;
        };
        let mut entity = commands.spawn((
            ConnectorLine::new(root, from, to),
            segment_transform(to_vec3(start.pos), to_vec3(end.pos)),
            ChildOf(root),
        ));
        if let (Some(render), Some(material)) = (render.as_deref(), line_material.as_ref()) {
            entity.insert((
                Mesh3d(render.connector_mesh.clone()),
                MeshMaterial3d(material.clone()),
            ));
        }
        let connector = entity.id();
        owners.register_member(connector, PickableKind::Connector, root);
        connectors.push(connector);
    }

    let mut root_commands = commands.entity(root);
    root_commands.insert(GroupMarker {
        name: spec.name.clone(),
        info: spec.info.clone(),
        stars,
        connectors,
    });
    if let Some(profile) = spec.depth_profile() {
        root_commands.insert(DepthProfile(profile));
    }
    debug!(
        "spawned group {} ({} stars, {} connections)",
        spec.name,
        spec.stars.len(),
        spec.connections.len()
    );
    root
}

pub(super) fn spawn_viewer_camera(commands: &mut Commands, config: &ViewerConfig, rendered: bool) -> Entity {
    let pose = config.overview_pose();
    let transform = Transform::from_translation(pose.position).looking_at(pose.look_at, Vec3::Y);
    let mut camera = commands.spawn((
        Name::new("viewer camera"),
        transform,
        ViewerCamera,
        FreeLookCamera {
            enabled: false,
            target: pose.look_at,
        },
        camera_projection(),
    ));
    if rendered {
        camera.insert(Camera3d::default());
        camera.with_child((
            PointLight {
                intensity: CAMERA_LIGHT_INTENSITY,
                range: CAMERA_FAR,
                ..default()
            },
            Transform::default(),
        ));
    }
    camera.id()
}

pub(super) fn camera_projection() -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: CAMERA_FOV_Y_DEGREES.to_radians(),
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
        ..default()
    })
}

fn star_material(style: &GroupStyle) -> StandardMaterial {
    StandardMaterial {
        base_color: color_from_hex(style.star_color),
        emissive: color_from_hex(style.star_emissive).to_linear(),
        perceptual_roughness: roughness_from_shininess(style.shininess),
        ..default()
    }
}

fn line_material(style: &GroupStyle) -> StandardMaterial {
    StandardMaterial {
        base_color: color_from_hex(style.line_color).with_alpha(style.line_opacity),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

/// Thin box spanning z in 0..1; scaled along z by the line follower.
fn connector_mesh() -> Mesh {
    Mesh::from(Cuboid::new(CONNECTOR_WIDTH, CONNECTOR_WIDTH, 1.0)).translated_by(Vec3::new(0.0, 0.0, 0.5))
}

fn starfield_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

pub(super) fn starfield_positions(count: usize, seed: u64) -> Vec<[f32; 3]> {
    let half = STARFIELD_EXTENT * 0.5;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            ]
        })
        .collect()
}

pub(super) fn color_from_hex(hex: u32) -> Color {
    Color::srgb_u8(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
}

/// Maps a Phong exponent onto perceptual roughness.
fn roughness_from_shininess(shininess: f32) -> f32 {
    (2.0 / (shininess.max(0.0) + 2.0)).sqrt().clamp(0.089, 1.0)
}

fn to_vec3(pos: CatalogPos) -> Vec3 {
    Vec3::from_array(pos.to_array())
}
