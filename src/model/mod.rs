// MODEL: Scene data and geometry
pub mod camera;
pub mod matcap;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod transform;

pub use camera::Camera;
pub use scene::{Background, BackgroundObject, Mirror, MirrorMaterial, PointLight, Population, Scene, SweepDirection};
pub use shapes::ShapeKind;
pub use transform::Transform;
