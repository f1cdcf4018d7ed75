use std::f32::consts::PI;

use glam::Vec3;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::config::SceneConfig;
use crate::model::camera::Camera;
use crate::model::matcap::{MATCAP_COUNT, TEXT_MATCAP};
use crate::model::shapes::{ShapeKind, BACKGROUND_SHAPES};
use crate::model::text::text_mesh;
use crate::model::transform::Transform;
use crate::utils::Mesh;

pub const TEXT_SIZE: f32 = 0.5;
pub const TEXT_DEPTH: f32 = 0.2;
pub const MIRROR_SIZE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundObject {
    pub transform: Transform,
    pub shape: ShapeKind,
    /// 1-based matcap number
    pub matcap: u8,
}

/// Background objects arrive after setup; until then the list is pending
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Background {
    #[default]
    Pending,
    Ready(Vec<BackgroundObject>),
}

impl Background {
    pub fn is_ready(&self) -> bool {
        matches!(self, Background::Ready(_))
    }

    pub fn objects(&self) -> &[BackgroundObject] {
        match self {
            Background::Pending => &[],
            Background::Ready(objects) => objects,
        }
    }

    pub fn objects_mut(&mut self) -> Option<&mut [BackgroundObject]> {
        match self {
            Background::Pending => None,
            Background::Ready(objects) => Some(objects),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 3.0, 4.0),
            color: Vec3::ONE,
            intensity: 30.0,
        }
    }
}

/// Physically based transmissive material of the mirror plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorMaterial {
    pub color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
}

impl Default for MirrorMaterial {
    fn default() -> Self {
        Self {
            // 0xffff00
            color: Vec3::new(1.0, 1.0, 0.0),
            metalness: 0.0001,
            roughness: 0.0001,
            transmission: 1.0,
            ior: 1.5,
            thickness: 0.5,
        }
    }
}

/// Direction the mirror's x rotation is currently sweeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepDirection {
    #[default]
    Down,
    Up,
}

impl SweepDirection {
    pub fn flipped(self) -> Self {
        match self {
            SweepDirection::Down => SweepDirection::Up,
            SweepDirection::Up => SweepDirection::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mirror {
    pub transform: Transform,
    pub material: MirrorMaterial,
    pub sweep: SweepDirection,
}

/// Objects created once the title and background are ready
#[derive(Debug, Clone)]
pub struct Population {
    pub title: Mesh,
    pub background: Vec<BackgroundObject>,
}

impl Population {
    pub fn generate(config: &SceneConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let background = (0..config.background_count)
            .map(|_| random_background_object(&mut rng, config.spread))
            .collect();
        Self {
            title: text_mesh(&config.title, TEXT_SIZE, TEXT_DEPTH),
            background,
        }
    }
}

fn random_background_object(rng: &mut impl Rng, spread: f32) -> BackgroundObject {
    let lucky: u8 = rng.gen_range(1..=MATCAP_COUNT as u8);
    let mut transform = Transform::from_position(Vec3::new(
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
    ));
    transform.rotation.x = rng.gen::<f32>() * PI;
    transform.set_uniform_scale(rng.gen::<f32>());

    BackgroundObject {
        transform,
        shape: BACKGROUND_SHAPES[lucky as usize - 1],
        matcap: lucky,
    }
}

/// Everything the frame loop animates and draws
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub mirror: Mirror,
    pub light: PointLight,
    pub title: Option<Mesh>,
    pub title_matcap: u8,
    pub background: Background,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(width, height),
            mirror: Mirror::default(),
            light: PointLight::default(),
            title: None,
            title_matcap: TEXT_MATCAP,
            background: Background::Pending,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.background.is_ready()
    }

    /// Install the title and background; the background length is fixed from here on
    pub fn populate(&mut self, population: Population) {
        self.title = Some(population.title);
        self.background = Background::Ready(population.background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_is_reproducible() {
        let config = SceneConfig { background_count: 50, ..Default::default() };
        let a = Population::generate(&config);
        let b = Population::generate(&config);
        assert_eq!(a.background, b.background);

        let other = Population::generate(&SceneConfig { seed: 1, ..config });
        assert_ne!(a.background, other.background);
    }

    #[test]
    fn test_population_bounds() {
        let config = SceneConfig::default();
        let population = Population::generate(&config);
        assert_eq!(population.background.len(), 1000);
        assert!(!population.title.is_empty());

        for obj in &population.background {
            let t = &obj.transform;
            assert!(t.position.abs().max_element() <= 50.0);
            assert!((0.0..PI).contains(&t.rotation.x));
            assert_eq!(t.rotation.y, 0.0);
            assert!((0.0..1.0).contains(&t.scale.x));
            assert_eq!(t.scale.x, t.scale.z);
            assert!((1..=6).contains(&obj.matcap));
            assert_eq!(obj.shape, BACKGROUND_SHAPES[obj.matcap as usize - 1]);
        }
    }

    #[test]
    fn test_every_matcap_slot_is_used() {
        let population = Population::generate(&SceneConfig::default());
        for n in 1..=6u8 {
            assert!(population.background.iter().any(|o| o.matcap == n), "matcap {n} unused");
        }
    }

    #[test]
    fn test_scene_starts_pending() {
        let mut scene = Scene::new(800, 600);
        assert!(!scene.is_populated());
        assert!(scene.background.objects().is_empty());
        assert!(scene.background.objects_mut().is_none());
        assert_eq!(scene.mirror.sweep, SweepDirection::Down);
        assert_eq!(scene.camera.eye, Vec3::new(0.0, 0.0, 15.0));

        let config = SceneConfig { background_count: 3, ..Default::default() };
        scene.populate(Population::generate(&config));
        assert!(scene.is_populated());
        assert_eq!(scene.background.objects().len(), 3);
    }
}
