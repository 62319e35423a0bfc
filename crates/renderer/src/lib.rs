//! Renderer crate for glowfield.
//!
//! Draws the procedural noise field as a full-screen quad through `wgpu`, or
//! evaluates a single frame on the CPU for still exports. The flow is:
//!
//! ```text
//!   CLI / glowfield
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window::run ──▶ winit event loop ──▶ GpuState::render()
//!          │                               │                    │
//!          │                               └─▶ resize()         ├─▶ Scene::tick() ─▶ UBO
//!          │                                                    └─▶ draw quad, present
//!          └──▶ still::export_still ──▶ shading::shade_fragment per pixel ──▶ PNG
//! ```
//!
//! `GpuState` owns every GPU resource (surface, device, pipeline, quad,
//! uniform buffer) together with the [`Scene`] that feeds the uniform set.
//! The field constants are baked into `field.frag` as preprocessor defines
//! when the pipeline is built.

mod compile;
mod error;
mod gpu;
mod runtime;
mod scene;
mod still;
mod types;
mod window;

use anyhow::Result;

pub use error::RendererError;
pub use gpu::FieldUniforms;
pub use runtime::{
    BoxedTimeSource, FrameClock, FrameScheduler, SystemTimeSource, TimeSample, TimeSource,
};
pub use scene::{Scene, Viewport};
pub use still::{export_still, render_still};
pub use types::{
    AdapterProfile, Antialiasing, ColorSpaceMode, GpuPowerPreference, RenderMode, RendererConfig,
};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Runs the configured mode to completion. Windowed mode returns when
    /// the window is closed.
    pub fn run(self) -> Result<()> {
        match self.config.mode.clone() {
            RenderMode::Windowed => window::run(self.config),
            RenderMode::Still { time, output } => {
                export_still(self.config.surface_size, time, &output, &self.config.field)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn still_mode_runs_without_a_display() {
        let dir = tempdir().expect("tempdir");
        let output = dir.path().join("still.png");
        let config = RendererConfig {
            surface_size: (16, 9),
            mode: RenderMode::Still {
                time: 4.0,
                output: output.clone(),
            },
            ..RendererConfig::default()
        };

        Renderer::new(config).run().expect("still export");
        assert!(output.is_file());
    }
}
