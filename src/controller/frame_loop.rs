use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::config::SceneConfig;
use crate::controller::{Animator, Clock, InputState, OrbitControls, PopulationLoader};
use crate::model::Scene;

/// Main loop state and per-frame update logic
pub struct FrameLoopContext {
    pub scene: Scene,
    pub animator: Animator,
    pub orbit: OrbitControls,
    pub input_state: Rc<RefCell<InputState>>,
    pub clock: Clock,
    pub loader: PopulationLoader,
    pub debug: bool,
    pub egui_ctx: egui::Context,
    pub egui_events: Rc<RefCell<Vec<egui::Event>>>,
    last_elapsed: f32,
}

impl FrameLoopContext {
    pub fn new(config: SceneConfig, width: u32, height: u32) -> Self {
        let animator = Animator::new(config.animation);
        let debug_panel = config.debug;
        info!(
            title = %config.title,
            count = config.background_count,
            seed = config.seed,
            debug = debug_panel,
            "starting scene"
        );
        Self {
            scene: Scene::new(width, height),
            animator,
            orbit: OrbitControls::new(),
            input_state: Rc::new(RefCell::new(InputState::new())),
            clock: Clock::start(),
            loader: PopulationLoader::spawn(config),
            debug: debug_panel,
            egui_ctx: egui::Context::default(),
            egui_events: Rc::new(RefCell::new(Vec::new())),
            last_elapsed: 0.0,
        }
    }

    /// Advance the scene to `elapsed` seconds; returns the frame delta
    pub fn step(&mut self, elapsed: f32, viewport_height: f32) -> f32 {
        if let Some(population) = self.loader.poll() {
            info!(count = population.background.len(), "scene populated");
            self.scene.populate(population);
        }

        self.animator.advance(&mut self.scene, elapsed);

        let (dx, dy, wheel) = self.input_state.borrow_mut().consume();
        if dx != 0.0 || dy != 0.0 {
            self.orbit.rotate_by_pixels(dx, dy, viewport_height);
        }
        if wheel != 0.0 {
            self.orbit.zoom(wheel);
        }
        self.orbit.update(&mut self.scene.camera.eye);

        let dt = (elapsed - self.last_elapsed).max(0.0);
        self.last_elapsed = elapsed;
        dt
    }

    /// Run the debug panel if enabled and record whether it owns the pointer
    pub fn run_ui(&mut self, raw_input: egui::RawInput, dt: f32) -> Option<egui::FullOutput> {
        if !self.debug {
            return None;
        }
        let full_output = crate::ui::build_ui(&self.egui_ctx, raw_input, &mut self.scene, dt);
        self.input_state.borrow_mut().ui_captured = self.egui_ctx.wants_pointer_input();
        Some(full_output)
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::FrameLoopContext;
    use crate::view::RenderState;
    use web_sys::{HtmlCanvasElement, Window};
    use wgpu::{Device, Queue, Surface};

    pub const MAX_PIXEL_RATIO: f64 = 2.0;

    pub fn pixel_ratio(window: &Window) -> f64 {
        window.device_pixel_ratio().min(MAX_PIXEL_RATIO)
    }

    impl FrameLoopContext {
        /// Update scene, camera and UI for one frame
        pub fn update(
            &mut self,
            device: &Device,
            queue: &Queue,
            window: &Window,
            canvas: &HtmlCanvasElement,
            surface: &Surface,
            render_state: &mut RenderState,
        ) {
            self.handle_resize(window, canvas, device, surface, render_state);

            let dpr = pixel_ratio(window) as f32;
            let elapsed = self.clock.elapsed();
            let dt = self.step(elapsed, render_state.height as f32 / dpr);
            render_state.prepare(device, queue, &self.scene);

            // Build egui input from queued events
            let mut raw_input = egui::RawInput::default();
            raw_input.time = Some(elapsed as f64);
            raw_input.screen_rect = Some(egui::Rect::from_min_size(
                egui::Pos2::new(0.0, 0.0),
                egui::vec2(render_state.width as f32 / dpr, render_state.height as f32 / dpr),
            ));
            raw_input.events.extend(self.egui_events.borrow_mut().drain(..));
            self.egui_ctx.set_pixels_per_point(dpr);

            if let Some(mut full_output) = self.run_ui(raw_input, dt) {
                let primitives = self.egui_ctx.tessellate(std::mem::take(&mut full_output.shapes), dpr);
                render_state.set_ui(primitives, full_output, dpr);
            }
        }

        fn handle_resize(
            &mut self,
            window: &Window,
            canvas: &HtmlCanvasElement,
            device: &Device,
            surface: &Surface,
            render_state: &mut RenderState,
        ) {
            if let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) {
                let dpr = pixel_ratio(window);
                let nw = (w.as_f64().unwrap_or(800.0) * dpr) as u32;
                let nh = (h.as_f64().unwrap_or(600.0) * dpr) as u32;
                if nw == 0 || nh == 0 || (nw == render_state.width && nh == render_state.height) {
                    return;
                }
                canvas.set_width(nw);
                canvas.set_height(nh);
                self.scene.camera.set_aspect(nw, nh);
                render_state.resize(device, surface, nw, nh);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::pixel_ratio;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::InputEvent;
    use std::time::Duration;

    fn context(count: usize) -> FrameLoopContext {
        let config = SceneConfig { background_count: count, ..Default::default() };
        FrameLoopContext::new(config, 800, 600)
    }

    fn wait_for_population(ctx: &mut FrameLoopContext) {
        let mut frame = 0;
        while !ctx.scene.is_populated() {
            frame += 1;
            assert!(frame < 1000, "population never arrived");
            std::thread::sleep(Duration::from_millis(2));
            ctx.step(0.0, 600.0);
        }
    }

    #[test]
    fn test_first_step_animates_camera_and_mirror() {
        let mut ctx = context(10);
        let z0 = ctx.scene.camera.eye.z;
        ctx.step(0.016, 600.0);
        assert!(ctx.scene.camera.eye.z < z0);
        assert!(ctx.scene.mirror.transform.rotation.x < 0.0);
    }

    #[test]
    fn test_population_is_installed_by_step() {
        let mut ctx = context(12);
        wait_for_population(&mut ctx);
        assert_eq!(ctx.scene.background.objects().len(), 12);
        assert!(ctx.scene.title.as_ref().is_some_and(|m| !m.is_empty()));
        assert!(ctx.loader.is_done());
    }

    #[test]
    fn test_drag_orbits_camera() {
        let mut ctx = context(0);
        {
            let mut input = ctx.input_state.borrow_mut();
            input.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
            input.process_event(&InputEvent::PointerMove { x: 100.0, y: 0.0 });
        }
        let before = ctx.scene.camera.eye;
        ctx.step(0.016, 600.0);
        let after = ctx.scene.camera.eye;
        assert!((after.x - before.x).abs() > 1e-3);
        // orbiting keeps the camera on its sphere, minus the dolly step
        assert!((after.length() - (before.length() - 0.01)).abs() < 1e-3);
    }

    #[test]
    fn test_step_reports_frame_delta() {
        let mut ctx = context(0);
        assert_eq!(ctx.step(0.5, 600.0), 0.5);
        assert!((ctx.step(0.75, 600.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_debug_flag_enables_panel() {
        let config = SceneConfig { background_count: 0, debug: true, ..Default::default() };
        let mut ctx = FrameLoopContext::new(config, 800, 600);
        assert!(ctx.debug);
        assert!(ctx.run_ui(egui::RawInput::default(), 0.016).is_some());
    }

    #[test]
    fn test_ui_disabled_without_debug() {
        let mut ctx = context(0);
        assert!(ctx.run_ui(egui::RawInput::default(), 0.016).is_none());
    }
}
