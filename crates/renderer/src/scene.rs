use winit::dpi::PhysicalSize;

use crate::gpu::FieldUniforms;
use crate::runtime::{FrameClock, TimeSample};

/// Size of the drawable surface in physical pixels. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Returns `None` for degenerate sizes (minimised windows report 0x0).
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<Viewport> for PhysicalSize<u32> {
    fn from(viewport: Viewport) -> Self {
        PhysicalSize::new(viewport.width, viewport.height)
    }
}

/// CPU side of the scene: the viewport, the frame clock and the uniform set
/// they feed.
///
/// The uniform set is written here (on resize and on every tick) and only read
/// by the GPU state when it records the draw.
pub struct Scene {
    viewport: Viewport,
    uniforms: FieldUniforms,
    clock: FrameClock,
}

impl Scene {
    pub fn new(viewport: Viewport, clock: FrameClock) -> Self {
        let mut scene = Self {
            viewport,
            uniforms: FieldUniforms::new(viewport.width, viewport.height),
            clock,
        };
        scene.resize(viewport.width, viewport.height);
        scene
    }

    /// Applies a host resize notification. Returns the new viewport, or
    /// `None` when the size was degenerate and ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<Viewport> {
        let viewport = Viewport::new(width, height)?;
        self.viewport = viewport;
        self.uniforms
            .set_resolution(viewport.width as f32, viewport.height as f32);
        Some(viewport)
    }

    /// Advances the clock and writes the new time into the uniform set.
    pub fn tick(&mut self) -> TimeSample {
        let sample = self.clock.tick();
        self.uniforms.set_time(sample.seconds);
        sample
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn uniforms(&self) -> &FieldUniforms {
        &self.uniforms
    }
}
