//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all shape rendering in the fragment shader.
//! Text handles are not drawn here; the browser host mirrors them into DOM nodes.

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
