use thiserror::Error;

/// Failures while building the window, GPU context or scene resources.
/// The per-frame loop itself has no error path.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("DOM setup failed: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<SetupError> for wasm_bindgen::JsValue {
    fn from(err: SetupError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
