// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub use web::start;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{error, info};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, Window};

    use crate::config::SceneConfig;
    use crate::controller::frame_loop::pixel_ratio;
    use crate::controller::input::wasm::{mouse_to_input, wheel_to_input};
    use crate::controller::{FrameLoopContext, InputEvent, InputState};
    use crate::error::SetupError;
    use crate::logging;
    use crate::view::{GpuContext, RenderState};

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();
        let (window, document, canvas) = init_canvas()?;
        setup_app(window, &document, canvas).await?;
        Ok(())
    }

    /// Main application setup for WASM
    async fn setup_app(window: Window, document: &Document, canvas: HtmlCanvasElement) -> Result<(), SetupError> {
        let href = window.location().href().map_err(|_| dom_error("page has no location"))?;
        let config = SceneConfig::from_url(&href);

        // Initialize GPU
        let gpu = GpuContext::new(&canvas, canvas.width(), canvas.height()).await?;
        let width = gpu.config.width;
        let height = gpu.config.height;

        let mut render_state = RenderState::new(gpu.device.as_ref(), gpu.queue.as_ref(), &gpu.config);
        let mut frame_ctx = FrameLoopContext::new(config, width, height);

        setup_input_listeners(
            document,
            &window,
            &canvas,
            frame_ctx.input_state.clone(),
            frame_ctx.egui_events.clone(),
        )
        .map_err(|_| dom_error("failed to register input listeners"))?;

        info!(width, height, "wasm setup complete");

        // Continuous redraw using requestAnimationFrame
        let f = RcCellCallback::new(window.clone(), {
            let window_for_loop = window.clone();
            move || {
                frame_ctx.update(
                    gpu.device.as_ref(),
                    gpu.queue.as_ref(),
                    &window_for_loop,
                    &canvas,
                    &gpu.surface,
                    &mut render_state,
                );
                render_state.draw_frame(gpu.device.as_ref(), gpu.queue.as_ref(), &gpu.surface);
            }
        });
        f.start();

        Ok(())
    }

    fn push_input(input_state: &Rc<RefCell<InputState>>, event: Option<InputEvent>) {
        if let Some(event) = event {
            input_state.borrow_mut().process_event(&event);
        }
    }

    fn pointer_button(e: &MouseEvent, pressed: bool) -> Option<egui::Event> {
        (e.button() == 0).then(|| egui::Event::PointerButton {
            pos: egui::pos2(e.client_x() as f32, e.client_y() as f32),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        })
    }

    /// Setup all input event listeners with platform-agnostic abstractions
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        canvas: &HtmlCanvasElement,
        input_state: Rc<RefCell<InputState>>,
        egui_events: Rc<RefCell<Vec<egui::Event>>>,
    ) -> Result<(), JsValue> {
        // Mouse down on the canvas starts an orbit drag
        {
            let input_state = input_state.clone();
            let egui_events = egui_events.clone();
            let mousedown = Closure::wrap(Box::new(move |e: MouseEvent| {
                egui_events.borrow_mut().extend(pointer_button(&e, true));
                push_input(&input_state, mouse_to_input("mousedown", &e));
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
            mousedown.forget();
        }

        // Mouse up anywhere ends it
        {
            let input_state = input_state.clone();
            let egui_events = egui_events.clone();
            let mouseup = Closure::wrap(Box::new(move |e: MouseEvent| {
                egui_events.borrow_mut().extend(pointer_button(&e, false));
                push_input(&input_state, mouse_to_input("mouseup", &e));
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
            mouseup.forget();
        }

        // Mouse move
        {
            let input_state = input_state.clone();
            let egui_events = egui_events.clone();
            let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
                let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
                egui_events.borrow_mut().push(egui::Event::PointerMoved(pos));
                push_input(&input_state, mouse_to_input("mousemove", &e));
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
            mm.forget();
        }

        // Mouse wheel zoom
        {
            let input_state = input_state.clone();
            let wheel = Closure::wrap(Box::new(move |e: Event| {
                if let Some(event) = wheel_to_input(&e) {
                    input_state.borrow_mut().process_event(&event);
                    e.prevent_default();
                }
            }) as Box<dyn FnMut(Event)>);
            canvas.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
            wheel.forget();
        }

        // Focus loss - drop any drag in progress
        {
            let input_state = input_state.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                input_state.borrow_mut().process_event(&InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        Ok(())
    }

    /// Full-window canvas at the device pixel ratio
    fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or(js_error("no global `window`"))?;
        let document = window.document().ok_or(js_error("no document on window"))?;
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;

        let dpr = pixel_ratio(&window);
        let css_width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let css_height = window.inner_height()?.as_f64().unwrap_or(600.0);
        canvas_el.set_width((css_width * dpr) as u32);
        canvas_el.set_height((css_height * dpr) as u32);
        canvas_el.style().set_property("width", "100vw")?;
        canvas_el.style().set_property("height", "100vh")?;
        canvas_el.style().set_property("display", "block")?;
        body.style().set_property("margin", "0")?;
        body.append_child(&canvas_el)?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    fn dom_error<E: Into<String>>(msg: E) -> SetupError {
        SetupError::Dom(msg.into())
    }

    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Recursively schedule next frame
                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                if let Err(e) = self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    error!("requestAnimationFrame start failed: {e:?}");
                }
            }

            // Leak the closure to keep it alive
            std::mem::forget(callback);
        }
    }
}
