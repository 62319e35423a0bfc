use bytemuck::{Pod, Zeroable};

/// CPU mirror of the `FieldUniforms` std140 block in `field.frag`.
///
/// ```text
///   offset 0   vec2  resolution
///   offset 8   float time
///   offset 12  float _padding
/// ```
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUniforms {
    resolution: [f32; 2],
    time: f32,
    _padding: f32,
}

unsafe impl Zeroable for FieldUniforms {}
unsafe impl Pod for FieldUniforms {}

impl FieldUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time: 0.0,
            _padding: 0.0,
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    pub fn resolution(&self) -> (f32, f32) {
        (self.resolution[0], self.resolution[1])
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
