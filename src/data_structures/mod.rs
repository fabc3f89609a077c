//! Engine data structures: meshes, textures, scene graph, and instances.
//!
//! - `model` contains vertex layouts and mesh buffers
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-node transformation data
//! - `scene_graph` is the globe scene: nodes, materials, lights and the builder

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
