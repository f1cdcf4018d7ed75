use std::sync::Arc;

use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

// Import from the library crate
use mirror_scene::{
    config::SceneConfig,
    controller::{FrameLoopContext, InputEvent},
    error::SetupError,
    logging,
    view::{GpuContext, RenderState},
};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

/// Everything that exists once the window is up
struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,
    frame_ctx: FrameLoopContext,
    egui_state: egui_winit::State,
    cursor: (f32, f32),
}

impl Running {
    async fn new(window: Arc<Window>, config: SceneConfig) -> Result<Self, SetupError> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone(), size.width, size.height).await?;
        let render_state = RenderState::new(gpu.device.as_ref(), gpu.queue.as_ref(), &gpu.config);
        let frame_ctx = FrameLoopContext::new(config, gpu.config.width, gpu.config.height);

        let egui_state = egui_winit::State::new(
            frame_ctx.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            window,
            gpu,
            render_state,
            frame_ctx,
            egui_state,
            cursor: (0.0, 0.0),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.frame_ctx.scene.camera.set_aspect(width.max(1), height.max(1));
        self.render_state
            .resize(self.gpu.device.as_ref(), &self.gpu.surface, width, height);
    }

    fn input(&mut self, event: &WindowEvent) {
        let scale = self.window.scale_factor();
        let input = match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale);
                self.cursor = (logical.x, logical.y);
                Some(InputEvent::PointerMove { x: logical.x, y: logical.y })
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => Some(InputEvent::PointerDown { x: self.cursor.0, y: self.cursor.1 }),
                ElementState::Released => Some(InputEvent::PointerUp),
            },
            // winit reports scroll-up as positive, the orbit zoom expects DOM sign
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => Some(InputEvent::Wheel { delta_y: -y }),
                MouseScrollDelta::PixelDelta(p) => Some(InputEvent::Wheel { delta_y: -p.y as f32 }),
            },
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        };
        if let Some(input) = input {
            self.frame_ctx.input_state.borrow_mut().process_event(&input);
        }
    }

    fn redraw(&mut self) {
        let device = self.gpu.device.as_ref();
        let queue = self.gpu.queue.as_ref();

        let elapsed = self.frame_ctx.clock.elapsed();
        let logical_height = self.render_state.height as f32 / self.window.scale_factor() as f32;
        let dt = self.frame_ctx.step(elapsed, logical_height);
        self.render_state.prepare(device, queue, &self.frame_ctx.scene);

        if self.frame_ctx.debug {
            let raw_input = self.egui_state.take_egui_input(&self.window);
            if let Some(mut full_output) = self.frame_ctx.run_ui(raw_input, dt) {
                self.egui_state
                    .handle_platform_output(&self.window, std::mem::take(&mut full_output.platform_output));
                let dpr = full_output.pixels_per_point;
                let primitives = self
                    .frame_ctx
                    .egui_ctx
                    .tessellate(std::mem::take(&mut full_output.shapes), dpr);
                self.render_state.set_ui(primitives, full_output, dpr);
            }
        }

        self.render_state.draw_frame(device, queue, &self.gpu.surface);
    }
}

struct App {
    config: SceneConfig,
    running: Option<Running>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Running::new(window, self.config.clone())) {
            Ok(running) => {
                info!("native setup complete");
                self.running = Some(running);
            }
            Err(e) => {
                error!("setup failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        // Let the debug panel see the event first
        if running.frame_ctx.debug && running.egui_state.on_window_event(&running.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => running.resize(size.width, size.height),
            WindowEvent::RedrawRequested => running.redraw(),
            other => running.input(&other),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn main() {
    logging::init();

    let config = SceneConfig::from_env();
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("failed to create event loop: {e}");
            return;
        }
    };

    let mut app = App { config, running: None };
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("event loop error: {e}");
    }
}
