/**
 * Everything that produces scene data from outside the GPU: procedural meshes
 * and texture images fetched from the assets folder (or the page origin on the web).
 */
pub mod mesh;
pub mod texture;
