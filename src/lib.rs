//! globe-flow
//!
//! A rotating, textured Earth with a drifting cloud shell, a light rig and a
//! marker pinned to a geographic location. Runs natively and in the browser
//! (WebGL2 through wgpu). Scene variants differ only in their
//! [`SceneOptions`]; [`flow::run`] opens a window and drives everything.
//!
//! High-level modules
//! - `geo`: latitude/longitude to Cartesian conversion
//! - `camera`: camera, projection, uniforms and the damped orbit controller
//! - `context`: GPU and window context (device, surface, camera and lights)
//! - `data_structures`: scene graph, meshes, instances, textures
//! - `debug`: keyboard-tunable scene parameters
//! - `flow`: the winit application and its event routing
//! - `frame`: the per-frame render loop and its ports
//! - `pipelines`: material pipelines and the light uniform
//! - `resources`: sphere tessellation and texture loading
//! - `render`: GPU mirror of the scene graph and the draw call
//! - `viewport`: logical size, pixel ratio and buffer size
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod debug;
pub mod flow;
pub mod frame;
pub mod geo;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod viewport;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use data_structures::scene_graph::{GlobeScene, LightRig, SceneOptions};
pub use flow::{GlobeOptions, run};
pub use geo::{AxisConvention, GeoCoordinate};
pub use wgpu;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point: renders the default globe into `canvas.webgl`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(GlobeOptions::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
