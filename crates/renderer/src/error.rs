use wgpu::naga::ShaderStage;

/// Fatal start-up failures. Once the first frame renders none of these can
/// occur any more.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("drawable surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(String),
    #[error("GPU max texture dimension is {max}, requested surface is {width}x{height}")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },
    #[error("failed to compile {stage:?} shader: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },
}
