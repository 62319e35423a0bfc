use std::borrow::Cow;

use shading::FieldParams;
use wgpu::naga::ShaderStage;

use crate::error::RendererError;

/// GLSL source of the full-screen quad vertex shader.
pub(crate) const VERTEX_SHADER_GLSL: &str = include_str!("shaders/fullscreen_quad.vert");

/// GLSL source of the noise field fragment shader.
pub(crate) const FRAGMENT_SHADER_GLSL: &str = include_str!("shaders/field.frag");

/// Preprocessor defines carrying the field constants into `field.frag`.
///
/// Floats are written with `{:?}` so they always keep a decimal point or an
/// exponent; GLSL would otherwise read `1` as an `int`.
pub(crate) fn field_defines(params: &FieldParams) -> Vec<(&'static str, String)> {
    vec![
        ("FIELD_DRIFT_RATE", format!("{:?}", params.drift_rate)),
        (
            "FIELD_SECONDARY_DRIFT_RATIO",
            format!("{:?}", params.secondary_drift_ratio),
        ),
        ("FIELD_OCTAVES", params.octaves.to_string()),
        ("FIELD_PRIMARY_SCALE", format!("{:?}", params.primary_scale)),
        ("FIELD_SECONDARY_SCALE", format!("{:?}", params.secondary_scale)),
    ]
}

/// Compiles the static quad vertex shader.
pub(crate) fn compile_vertex_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, RendererError> {
    create_checked_module(
        device,
        "fullscreen quad vertex",
        VERTEX_SHADER_GLSL,
        ShaderStage::Vertex,
        &[],
    )
}

/// Compiles the field fragment shader with `params` baked in.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    params: &FieldParams,
) -> Result<wgpu::ShaderModule, RendererError> {
    let defines = field_defines(params);
    let defines: Vec<(&str, &str)> = defines
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    tracing::debug!(?defines, "compiling field fragment shader");
    create_checked_module(
        device,
        "glowfield fragment",
        FRAGMENT_SHADER_GLSL,
        ShaderStage::Fragment,
        &defines,
    )
}

/// Creates a shader module inside a validation error scope so a broken shader
/// surfaces as [`RendererError::ShaderCompile`] instead of the device's
/// uncaptured-error panic.
fn create_checked_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
    defines: &[(&str, &str)],
) -> Result<wgpu::ShaderModule, RendererError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines,
        },
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(RendererError::ShaderCompile {
            stage,
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}
