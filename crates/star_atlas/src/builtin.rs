use crate::catalog::{Catalog, Connection, GroupSpec, GroupStyle, ShimmerStyle, StarSpec};
use crate::geometry::CatalogPos;

const ORION_SCALE: f32 = 2.0;
const DIPPER_SCALE: f32 = 1.5;
const CASSIOPEIA_SCALE: f32 = 1.5;

const ORION_REFERENCE_LY: f32 = 26.0;
const DIPPER_REFERENCE_LY: f32 = 78.0;
const CASSIOPEIA_REFERENCE_LY: f32 = 55.0;

/// Orion carries depth directly in its layout; the others unfold from flat.
fn orion_depth(distance_ly: f32) -> f32 {
    (ORION_REFERENCE_LY - distance_ly) / 100.0
}

fn unfolded_depth(reference_ly: f32, distance_ly: f32, jitter: f32) -> f32 {
    (reference_ly - distance_ly) / 20.0 + jitter
}

fn connections(pairs: &[(usize, usize)]) -> Vec<Connection> {
    pairs.iter().map(|&(a, b)| Connection(a, b)).collect()
}

fn orion_star(name: &str, x: f32, y: f32, brightness: f32, distance_ly: f32) -> StarSpec {
    StarSpec::new(
        name,
        CatalogPos::new(x * ORION_SCALE, y * ORION_SCALE, orion_depth(distance_ly)),
        brightness,
        &format!("{distance_ly} ly"),
    )
}

fn flat_star(
    name: &str,
    x: f32,
    y: f32,
    scale: f32,
    brightness: f32,
    distance_ly: f32,
    extended_depth: f32,
) -> StarSpec {
    StarSpec::new(
        name,
        CatalogPos::new(x * scale, y * scale, 0.0),
        brightness,
        &format!("{distance_ly} ly"),
    )
    .with_extended_depth(extended_depth)
}

pub fn orion() -> GroupSpec {
    GroupSpec {
        name: "Orion".to_string(),
        info: "Orion is a prominent constellation located on the celestial equator and visible \
               throughout the world. It is one of the most conspicuous and recognizable \
               constellations in the night sky, known for its 'Hunter' shape."
            .to_string(),
        position: CatalogPos::ORIGIN,
        stars: vec![
            orion_star("Betelgeuse", -5.8, 7.4, 0.5, 642.0),
            orion_star("Meissa", -4.0, 9.9, 3.4, 1100.0),
            orion_star("Bellatrix", 3.9, 6.3, 1.6, 250.0),
            orion_star("Alnitak", -1.7, -1.9, 1.7, 1260.0),
            orion_star("Alnilam", -0.5, -1.2, 1.7, 2000.0),
            orion_star("Mintaka", 1.9, -0.3, 2.2, 1200.0),
            orion_star("Saiph", -2.0, -9.7, 2.1, 650.0),
            orion_star("Rigel", 5.5, -8.2, 0.1, 860.0),
            orion_star("Pi3 Orionis", 10.2, 3.5, 3.2, 26.0),
            orion_star("Omicron2 Ori", 11.0, 4.8, 4.0, 1400.0),
            orion_star("Pi4 Orionis", 11.5, 2.9, 3.7, 1250.0),
            orion_star("Pi5 Orionis", 10.2, 0.1, 3.7, 1300.0),
        ],
        connections: connections(&[
            (0, 1),
            (1, 2),
            (0, 4),
            (2, 4),
            (3, 4),
            (4, 5),
            (3, 6),
            (5, 7),
            (6, 7),
            (2, 8),
            (8, 10),
            (9, 10),
            (10, 11),
        ]),
        style: GroupStyle {
            star_color: 0xffffff,
            star_emissive: 0xeeeeff,
            shininess: 50.0,
            line_color: 0x6688ff,
            line_opacity: 0.7,
            shimmer: ShimmerStyle {
                speed: 3.0,
                phase_scale: 0.5,
                amplitude: 0.3,
                bias: 0.7,
                scale_base: 0.8,
                scale_gain: 0.4,
            },
        },
    }
}

pub fn big_dipper() -> GroupSpec {
    let s = DIPPER_SCALE;
    let r = DIPPER_REFERENCE_LY;
    GroupSpec {
        name: "Big Dipper".to_string(),
        info: "The Big Dipper is an asterism of seven bright stars in the constellation Ursa \
               Major. It is one of the most recognizable patterns in the night sky."
            .to_string(),
        position: CatalogPos::new(-75.0, -20.0, 0.0),
        stars: vec![
            flat_star("Alkaid", 0.0, 12.0, s, 1.9, 104.0, unfolded_depth(r, 104.0, 0.3)),
            flat_star("Mizar", 4.5, 9.0, s, 2.2, 78.0, unfolded_depth(r, 78.0, -0.7)),
            flat_star("Alioth", 8.1, 6.0, s, 1.8, 81.0, unfolded_depth(r, 81.0, 0.5)),
            flat_star("Megrez", 10.5, 3.0, s, 3.3, 80.0, unfolded_depth(r, 80.0, -0.2)),
            flat_star("Phecda", 8.1, -3.0, s, 2.4, 84.0, unfolded_depth(r, 84.0, 0.8)),
            flat_star("Dubhe", 16.5, 0.0, s, 1.8, 123.0, unfolded_depth(r, 123.0, -0.6)),
            flat_star("Merak", 16.5, -6.0, s, 2.4, 79.0, unfolded_depth(r, 79.0, 0.4)),
        ],
        connections: connections(&[(0, 1), (1, 2), (2, 3), (3, 5), (5, 6), (6, 4), (4, 3)]),
        style: GroupStyle {
            star_color: 0xfffbe0,
            star_emissive: 0xeeeecc,
            shininess: 50.0,
            line_color: 0xffd700,
            line_opacity: 0.7,
            shimmer: ShimmerStyle {
                speed: 2.5,
                phase_scale: 0.3,
                amplitude: 0.4,
                bias: 0.6,
                scale_base: 0.7,
                scale_gain: 0.5,
            },
        },
    }
}

pub fn cassiopeia() -> GroupSpec {
    let s = CASSIOPEIA_SCALE;
    let r = CASSIOPEIA_REFERENCE_LY;
    GroupSpec {
        name: "Cassiopeia".to_string(),
        info: "Cassiopeia is a prominent constellation in the northern sky, easily recognizable \
               for its distinctive 'W' shape formed by five bright stars."
            .to_string(),
        position: CatalogPos::new(75.0, -20.0, 0.0),
        stars: vec![
            flat_star("Schedar", 0.0, 0.0, s, 2.2, 228.0, unfolded_depth(r, 228.0, 0.2)),
            flat_star("Caph", 4.0, 3.0, s, 2.3, 55.0, unfolded_depth(r, 55.0, -0.5)),
            flat_star("Gamma Cas", 8.0, 0.0, s, 2.2, 610.0, unfolded_depth(r, 610.0, 0.7)),
            flat_star("Ruchbah", 12.0, 3.0, s, 2.7, 99.0, unfolded_depth(r, 99.0, -0.3)),
            flat_star("Segin", 16.0, 0.0, s, 3.4, 440.0, unfolded_depth(r, 440.0, 0.6)),
        ],
        connections: connections(&[(0, 1), (1, 2), (2, 3), (3, 4)]),
        style: GroupStyle {
            star_color: 0xffffff,
            star_emissive: 0xe6e6ff,
            shininess: 80.0,
            line_color: 0xd580ff,
            line_opacity: 0.85,
            shimmer: ShimmerStyle {
                speed: 3.5,
                phase_scale: 0.4,
                amplitude: 0.35,
                bias: 0.65,
                scale_base: 0.75,
                scale_gain: 0.45,
            },
        },
    }
}

/// The three groups shipped with the viewer, in display order.
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![orion(), big_dipper(), cassiopeia()])
}
