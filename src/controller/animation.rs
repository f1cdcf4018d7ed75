use glam::Vec3;

use crate::config::AnimationConfig;
use crate::model::{BackgroundObject, Mirror, Scene, SweepDirection};

/// Per-frame scene animation. Positions accumulate per frame; background
/// rotations are recomputed from absolute elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Animator {
    pub config: AnimationConfig,
}

impl Animator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    /// Advance the scene by one frame at `elapsed` seconds since start
    pub fn advance(&self, scene: &mut Scene, elapsed: f32) {
        dolly_camera(&mut scene.camera.eye, &self.config);
        sweep_mirror(&mut scene.mirror, &self.config);
        // population may still be in flight
        if let Some(objects) = scene.background.objects_mut() {
            animate_background(objects, elapsed, &self.config);
        }
    }
}

/// Move the camera towards the scene until it reaches the stop depth
pub fn dolly_camera(eye: &mut Vec3, config: &AnimationConfig) {
    if eye.z > config.camera_dolly_stop_z {
        eye.z -= config.camera_dolly_step;
    }
}

/// Flip on a strict bound crossing, then take one step in the current direction.
/// The check runs before the step, so the angle may overshoot a bound by one step.
pub fn sweep_mirror(mirror: &mut Mirror, config: &AnimationConfig) {
    let angle = mirror.transform.rotation.x;
    if angle < config.mirror_lower_bound || angle > config.mirror_upper_bound {
        mirror.sweep = mirror.sweep.flipped();
    }
    match mirror.sweep {
        SweepDirection::Down => mirror.transform.rotation.x -= config.mirror_sweep_step,
        SweepDirection::Up => mirror.transform.rotation.x += config.mirror_sweep_step,
    }
}

/// Even indices sink and spin backwards, odd indices rise and spin forwards
pub fn animate_background(objects: &mut [BackgroundObject], elapsed: f32, config: &AnimationConfig) {
    for (index, obj) in objects.iter_mut().enumerate() {
        let t = &mut obj.transform;
        if index % 2 == 0 {
            t.position.y -= config.background_drift_step;
            t.set_uniform_rotation(-(elapsed * config.even_spin_rate));
        } else {
            t.position.y += config.background_drift_step;
            t.set_uniform_rotation(elapsed * config.odd_spin_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::model::{Population, ShapeKind, Transform};

    const EPS: f32 = 1e-5;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    fn object_at_y(y: f32) -> BackgroundObject {
        BackgroundObject {
            transform: Transform::from_position(Vec3::new(0.0, y, 0.0)),
            shape: ShapeKind::Octahedron,
            matcap: 1,
        }
    }

    fn scene_with(objects: Vec<BackgroundObject>) -> Scene {
        let mut scene = Scene::new(800, 600);
        scene.populate(Population {
            title: crate::utils::Mesh::empty(),
            background: objects,
        });
        scene
    }

    #[test]
    fn test_two_objects_one_frame() {
        let mut scene = scene_with(vec![object_at_y(2.0), object_at_y(-3.0)]);
        Animator::default().advance(&mut scene, 1.0);

        let objects = scene.background.objects();
        assert_eq!(objects[0].transform.rotation, Vec3::splat(-0.4));
        assert!(approx(objects[0].transform.position.y, 2.0 - 0.003, EPS));
        assert_eq!(objects[1].transform.rotation, Vec3::splat(0.3));
        assert!(approx(objects[1].transform.position.y, -3.0 + 0.003, EPS));
    }

    #[test]
    fn test_background_rotation_is_absolute() {
        let config = AnimationConfig::default();
        let mut objects = vec![object_at_y(0.0), object_at_y(0.0), object_at_y(0.0)];
        for t in [0.0f32, 0.5, 2.0, 10.0, 2.0] {
            animate_background(&mut objects, t, &config);
            animate_background(&mut objects, t, &config);
            for (i, obj) in objects.iter().enumerate() {
                let expected = if i % 2 == 0 { -0.4 * t } else { 0.3 * t };
                assert_eq!(obj.transform.rotation, Vec3::splat(expected));
            }
        }
    }

    #[test]
    fn test_background_position_accumulates() {
        let config = AnimationConfig::default();
        let mut objects = vec![object_at_y(1.0), object_at_y(1.0)];
        let frames = 500;
        for n in 0..frames {
            animate_background(&mut objects, n as f32 / 60.0, &config);
        }
        assert!(approx(objects[0].transform.position.y, 1.0 - 0.003 * frames as f32, 1e-3));
        assert!(approx(objects[1].transform.position.y, 1.0 + 0.003 * frames as f32, 1e-3));
        assert_eq!(objects[0].transform.position.x, 0.0);
    }

    #[test]
    fn test_pending_background_is_skipped() {
        let mut scene = Scene::new(800, 600);
        Animator::default().advance(&mut scene, 3.0);
        assert!(!scene.is_populated());
        assert!(approx(scene.camera.eye.z, 15.0 - 0.01, EPS));
    }

    #[test]
    fn test_mirror_first_frame_from_zero() {
        let mut mirror = Mirror::default();
        sweep_mirror(&mut mirror, &AnimationConfig::default());
        assert_eq!(mirror.sweep, SweepDirection::Down);
        assert!(approx(mirror.transform.rotation.x, -0.0001, 1e-9));
    }

    #[test]
    fn test_mirror_flips_only_on_strict_crossing() {
        let config = AnimationConfig::default();

        let mut mirror = Mirror::default();
        mirror.transform.rotation.x = -1.0;
        sweep_mirror(&mut mirror, &config);
        assert_eq!(mirror.sweep, SweepDirection::Down);

        mirror.transform.rotation.x = -1.00005;
        mirror.sweep = SweepDirection::Down;
        sweep_mirror(&mut mirror, &config);
        assert_eq!(mirror.sweep, SweepDirection::Up);
        assert!(mirror.transform.rotation.x > -1.00005);

        mirror.transform.rotation.x = 0.00005;
        sweep_mirror(&mut mirror, &config);
        assert_eq!(mirror.sweep, SweepDirection::Down);
        assert!(mirror.transform.rotation.x < 0.00005);
    }

    #[test]
    fn test_mirror_stays_within_bounds() {
        let config = AnimationConfig::default();
        let mut mirror = Mirror::default();
        let mut flips = 0;
        let mut last = mirror.sweep;
        // a bit over two full sweeps
        for _ in 0..45_000 {
            sweep_mirror(&mut mirror, &config);
            let x = mirror.transform.rotation.x;
            assert!(x >= -1.0 - 2.0 * config.mirror_sweep_step, "x = {x}");
            assert!(x <= 0.0 + 2.0 * config.mirror_sweep_step, "x = {x}");
            if mirror.sweep != last {
                flips += 1;
                last = mirror.sweep;
            }
        }
        assert!(flips >= 2);
    }

    #[test]
    fn test_camera_dolly_converges() {
        let config = AnimationConfig::default();
        let mut eye = Vec3::new(0.0, 0.0, 15.0);
        let mut previous = eye.z;
        for _ in 0..1000 {
            dolly_camera(&mut eye, &config);
            assert!(eye.z <= previous);
            previous = eye.z;
        }
        assert!(eye.z <= 5.0 + 1e-3);
        assert!(eye.z > 5.0 - config.camera_dolly_step);

        // more frames drain any float residue, then it holds
        for _ in 0..10 {
            dolly_camera(&mut eye, &config);
        }
        let settled = eye.z;
        assert!(settled <= 5.0 && settled > 5.0 - config.camera_dolly_step);
        for _ in 0..100 {
            dolly_camera(&mut eye, &config);
        }
        assert_eq!(eye.z, settled);
    }

    #[test]
    fn test_camera_below_threshold_holds() {
        let mut eye = Vec3::new(1.0, 2.0, 4.0);
        dolly_camera(&mut eye, &AnimationConfig::default());
        assert_eq!(eye, Vec3::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn test_full_population_animates() {
        let config = SceneConfig { background_count: 10, ..Default::default() };
        let mut scene = Scene::new(800, 600);
        scene.populate(Population::generate(&config));
        let before: Vec<f32> = scene.background.objects().iter().map(|o| o.transform.position.y).collect();

        Animator::new(config.animation).advance(&mut scene, 2.0);

        let objects = scene.background.objects();
        assert_eq!(objects.len(), 10);
        for (i, (obj, y0)) in objects.iter().zip(before).enumerate() {
            let dy = obj.transform.position.y - y0;
            if i % 2 == 0 {
                assert!(approx(dy, -0.003, 1e-4));
            } else {
                assert!(approx(dy, 0.003, 1e-4));
            }
        }
    }
}
