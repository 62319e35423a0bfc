//! GPU side of the renderer.
//!
//! - `context` owns the wgpu instance/device/surface wiring and rebuilds the
//!   swapchain when the window resizes.
//! - `quad` holds the static full-screen geometry.
//! - `pipeline` compiles the GLSL pair into the one render pipeline.
//! - `uniforms` mirrors the `FieldUniforms` std140 block.
//! - `state` glues everything together behind the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod quad;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub use uniforms::FieldUniforms;
