use std::path::PathBuf;

use shading::FieldParams;

/// How the renderer should present frames.
///
/// * `Windowed` opens a window (optionally borderless fullscreen) and animates
///   the field until the window is closed.
/// * `Still` evaluates a single frame on the CPU and writes it to disk; no GPU
///   or display is required.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderMode {
    Windowed,
    Still {
        /// Timestamp the field is evaluated at (seconds).
        time: f32,
        /// Destination PNG path.
        output: PathBuf,
    },
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Same as `Gamma`: the field is already gamma-shaped, like a WebGL canvas.
    #[default]
    Auto,
    /// Write shader output untouched; prefer non-sRGB surfaces.
    Gamma,
    /// Treat shader output as linear and let an sRGB swapchain encode it.
    Linear,
}

/// Adapter selection hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    /// Integrated GPU where available; a background should not wake the dGPU.
    #[default]
    Low,
    High,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and the config file; it decides how
/// large the surface is, which presentation mode to use, and which field
/// constants the shader is compiled with.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window or image size in physical pixels.
    pub surface_size: (u32, u32),
    /// Presentation mode (animated window vs still export).
    pub mode: RenderMode,
    /// Open the window borderless fullscreen on the current monitor.
    pub fullscreen: bool,
    /// FPS cap. `Some(0.0)` renders on every display refresh; `None` leaves
    /// the choice to the renderer, which caps software adapters.
    pub target_fps: Option<f32>,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Desired color handling for the swapchain.
    pub color_space: ColorSpaceMode,
    /// Adapter power preference.
    pub gpu_power: GpuPowerPreference,
    /// Noise field constants.
    pub field: FieldParams,
    /// Window title.
    pub title: String,
}

impl Default for RendererConfig {
    /// Provides a 1080p windowed configuration with the reference field.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            mode: RenderMode::Windowed,
            fullscreen: false,
            target_fps: None,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
            gpu_power: GpuPowerPreference::default(),
            field: FieldParams::default(),
            title: "glowfield".to_string(),
        }
    }
}

/// Summary of the adapter chosen at start-up.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub max_texture_dimension: u32,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            max_texture_dimension: limits.max_texture_dimension_2d,
        }
    }

    /// Software rasterizers (llvmpipe, WARP, SwiftShader) report `Cpu`.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || self.name.to_ascii_lowercase().contains("llvmpipe")
    }

    /// Whether a `width`x`height` surface stays within the 2D texture limit.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.max_texture_dimension && height <= self.max_texture_dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, device_type: wgpu::DeviceType) -> AdapterProfile {
        AdapterProfile {
            name: name.to_string(),
            backend: wgpu::Backend::Vulkan,
            device_type,
            max_texture_dimension: 8192,
        }
    }

    #[test]
    fn detects_software_adapters() {
        assert!(profile("SwiftShader", wgpu::DeviceType::Cpu).is_software());
        assert!(profile("llvmpipe (LLVM 17.0.6, 256 bits)", wgpu::DeviceType::Other).is_software());
        assert!(!profile("AMD Radeon RX 7800 XT", wgpu::DeviceType::DiscreteGpu).is_software());
    }

    #[test]
    fn surface_extent_is_bounded_by_texture_limit() {
        let gpu = profile("AMD Radeon RX 7800 XT", wgpu::DeviceType::DiscreteGpu);
        assert!(gpu.fits(8192, 8192));
        assert!(gpu.fits(1, 8192));
        assert!(!gpu.fits(8193, 600));
        assert!(!gpu.fits(800, 8193));
    }

    #[test]
    fn default_config_is_a_windowed_reference_field() {
        let config = RendererConfig::default();
        assert_eq!(config.mode, RenderMode::Windowed);
        assert_eq!(config.field, FieldParams::default());
        assert_eq!(config.target_fps, None);
        assert_eq!(config.gpu_power, GpuPowerPreference::Low);
    }
}
