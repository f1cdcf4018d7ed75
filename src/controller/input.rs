/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp,
    PointerMove { x: f32, y: f32 },
    Wheel { delta_y: f32 },
    FocusLost,
}

/// Pointer deltas accumulated between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub dragging: bool,
    pub pointer_pos: Option<(f32, f32)>,
    pub drag_delta: (f32, f32),
    pub wheel_delta: f32,
    /// Set while the debug panel owns the pointer
    pub ui_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                if !self.ui_captured {
                    self.dragging = true;
                }
                self.pointer_pos = Some((x, y));
            }
            InputEvent::PointerUp => {
                self.dragging = false;
            }
            InputEvent::PointerMove { x, y } => {
                if self.dragging {
                    if let Some((px, py)) = self.pointer_pos {
                        self.drag_delta.0 += x - px;
                        self.drag_delta.1 += y - py;
                    }
                }
                self.pointer_pos = Some((x, y));
            }
            InputEvent::Wheel { delta_y } => {
                if !self.ui_captured {
                    self.wheel_delta += delta_y;
                }
            }
            InputEvent::FocusLost => {
                self.dragging = false;
                self.drag_delta = (0.0, 0.0);
                self.wheel_delta = 0.0;
            }
        }
    }

    /// Take the accumulated (drag dx, drag dy, wheel) and reset them
    pub fn consume(&mut self) -> (f32, f32, f32) {
        let (dx, dy) = std::mem::take(&mut self.drag_delta);
        let wheel = std::mem::take(&mut self.wheel_delta);
        (dx, dy, wheel)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::InputEvent;
    use wasm_bindgen::JsCast;

    pub fn mouse_to_input(kind: &str, e: &web_sys::MouseEvent) -> Option<InputEvent> {
        let (x, y) = (e.client_x() as f32, e.client_y() as f32);
        match kind {
            "mousedown" if e.button() == 0 => Some(InputEvent::PointerDown { x, y }),
            "mouseup" => Some(InputEvent::PointerUp),
            "mousemove" => Some(InputEvent::PointerMove { x, y }),
            _ => None,
        }
    }

    pub fn wheel_to_input(e: &web_sys::Event) -> Option<InputEvent> {
        e.dyn_ref::<web_sys::WheelEvent>()
            .map(|w| InputEvent::Wheel { delta_y: w.delta_y() as f32 })
    }
}
