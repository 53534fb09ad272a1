use bevy::prelude::*;
use star_atlas::ShimmerStyle;

use super::viewer_config::ViewerConfig;

/// Per-star twinkle. `base_emissive` is the style colour at intensity 1.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub(super) struct StarShimmer {
    pub style: ShimmerStyle,
    pub base_emissive: LinearRgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ShimmerSample {
    pub intensity: f32,
    pub scale: f32,
}

pub(super) fn shimmer_sample(style: &ShimmerStyle, elapsed_secs: f32, x: f32) -> ShimmerSample {
    let intensity = style.intensity(elapsed_secs, x);
    ShimmerSample {
        intensity,
        scale: style.scale_for(intensity),
    }
}

/// Scales the star uniformly and its emissive colour; depth is left alone.
pub(super) fn update_star_shimmer(
    time: Res<Time>,
    config: Res<ViewerConfig>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut stars: Query<(
        &StarShimmer,
        &mut Transform,
        Option<&MeshMaterial3d<StandardMaterial>>,
    )>,
) {
    if !config.shimmer_enabled {
        return;
    }
    let elapsed = time.elapsed_secs();
    for (shimmer, mut transform, material) in &mut stars {
        let sample = shimmer_sample(&shimmer.style, elapsed, transform.translation.x);
        transform.scale = Vec3::splat(sample.scale);

        let (Some(materials), Some(material)) = (materials.as_deref_mut(), material) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = shimmer.base_emissive * sample.intensity.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ORION: ShimmerStyle = ShimmerStyle {
        speed: 3.0,
        phase_scale: 0.5,
        amplitude: 0.3,
        bias: 0.7,
        scale_base: 0.8,
        scale_gain: 0.4,
    };

    #[test]
    fn sample_follows_style_curve() {
        let sample = shimmer_sample(&ORION, 0.0, 0.0);
        assert!((sample.intensity - 0.7).abs() < 1e-6);
        assert!((sample.scale - 1.08).abs() < 1e-6);

        let peak_time = std::f32::consts::FRAC_PI_2 / ORION.speed;
        let peak = shimmer_sample(&ORION, peak_time, 0.0);
        assert!((peak.intensity - 1.0).abs() < 1e-5);
        assert!((peak.scale - 1.2).abs() < 1e-5);
    }

    #[test]
    fn phase_depends_on_star_x() {
        let left = shimmer_sample(&ORION, 1.0, -4.0);
        let right = shimmer_sample(&ORION, 1.0, 4.0);
        assert_ne!(left.intensity, right.intensity);
    }

    fn shimmer_app(enabled: bool) -> (App, Entity) {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default());
        app.insert_resource(ViewerConfig {
            shimmer_enabled: enabled,
            ..ViewerConfig::default()
        });
        app.add_systems(Update, update_star_shimmer);
        let star = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 2.0, 1.25),
                StarShimmer {
                    style: ORION,
                    base_emissive: LinearRgba::WHITE,
                },
            ))
            .id();
        (app, star)
    }

    #[test]
    fn shimmer_scales_star_but_keeps_depth() {
        let (mut app, star) = shimmer_app(true);
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(250));
        app.update();

        let transform = app.world().get::<Transform>(star).copied().expect("star");
        let expected = shimmer_sample(&ORION, 0.25, 0.0).scale;
        assert!((transform.scale.x - expected).abs() < 1e-5);
        assert_eq!(transform.scale.x, transform.scale.z);
        assert_eq!(transform.translation.z, 1.25);
    }

    #[test]
    fn disabled_shimmer_leaves_scale_alone() {
        let (mut app, star) = shimmer_app(false);
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(250));
        app.update();

        let transform = app.world().get::<Transform>(star).copied().expect("star");
        assert_eq!(transform.scale, Vec3::ONE);
    }
}
