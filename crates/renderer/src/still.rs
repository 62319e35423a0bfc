use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use shading::{shade_fragment, FieldParams, Vec2, Vec4};

/// Largest still edge, in pixels.
const MAX_STILL_DIMENSION: u32 = 16_384;

/// Evaluates one frame of the field on the CPU.
///
/// Row 0 of the returned image is the top of the screen; the shading
/// function itself works with a bottom-left origin at pixel centres.
pub fn render_still(width: u32, height: u32, time: f32, params: &FieldParams) -> RgbaImage {
    let resolution = Vec2::new(width as f32, height as f32);
    RgbaImage::from_fn(width, height, |x, row| {
        let frag_coord = Vec2::new(x as f32 + 0.5, (height - row) as f32 - 0.5);
        to_rgba8(shade_fragment(frag_coord, time, resolution, params))
    })
}

fn to_rgba8(colour: Vec4) -> Rgba<u8> {
    let quantise = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        quantise(colour.x),
        quantise(colour.y),
        quantise(colour.z),
        quantise(colour.w),
    ])
}

/// Renders a still and writes it to `output` as PNG.
pub fn export_still(
    size: (u32, u32),
    time: f32,
    output: &Path,
    params: &FieldParams,
) -> Result<PathBuf> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        bail!("still size must be non-zero (got {width}x{height})");
    }
    if width > MAX_STILL_DIMENSION || height > MAX_STILL_DIMENSION {
        bail!("still size {width}x{height} exceeds the {MAX_STILL_DIMENSION}px limit per edge");
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .with_context(|| format!("still size {width}x{height} does not fit in memory"))?;
    if !time.is_finite() || time < 0.0 {
        bail!("still time must be a non-negative number of seconds (got {time})");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let started = std::time::Instant::now();
    let image = render_still(width, height, time, params);
    image
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("failed to write still frame to {}", output.display()))?;

    tracing::info!(
        path = %output.display(),
        width,
        height,
        time,
        elapsed_ms = started.elapsed().as_millis(),
        "still frame written"
    );
    Ok(output.to_path_buf())
}
