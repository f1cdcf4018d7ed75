// CONTROLLER: Input, animation, and update loop
pub mod animation;
pub mod clock;
pub mod frame_loop;
pub mod input;
pub mod loader;
pub mod orbit;

pub use animation::Animator;
pub use clock::Clock;
pub use frame_loop::FrameLoopContext;
pub use input::{InputEvent, InputState};
pub use loader::PopulationLoader;
pub use orbit::OrbitControls;
