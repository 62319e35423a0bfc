use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fieldconfig::{AntialiasSetting, ColorSpaceSetting, GpuPowerSetting, SurfaceSize};
use renderer::{Antialiasing, ColorSpaceMode, GpuPowerPreference};

use crate::bindings::{map_antialias, map_color_space, map_gpu_power};

#[derive(Parser, Debug)]
#[command(
    name = "glowfield",
    author,
    version,
    about = "Animated procedural noise-field background"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub window: WindowArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by the window and `still`.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Configuration file; defaults to `<config dir>/glowfield/config.toml`.
    #[arg(long, value_name = "PATH", env = "GLOWFIELD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Drift speed of the noise field (default 0.08).
    #[arg(long, value_name = "RATE", global = true, allow_negative_numbers = true)]
    pub drift_rate: Option<f32>,

    /// Number of fbm octaves, 1 to 12 (default 5).
    #[arg(long, value_name = "N", global = true)]
    pub octaves: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct WindowArgs {
    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<SurfaceSize>,

    /// Open borderless fullscreen on the current monitor.
    #[arg(long)]
    pub fullscreen: bool,

    /// Optional FPS cap (0=every display refresh).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Output color space handling: `auto`, `gamma`, or `linear`.
    #[arg(long, value_name = "MODE", value_parser = parse_color_space)]
    pub color_space: Option<ColorSpaceMode>,

    /// Adapter power preference: `low` or `high`.
    #[arg(long, value_name = "PREFERENCE", value_parser = parse_gpu_power)]
    pub gpu_power: Option<GpuPowerPreference>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a single frame on the CPU and write it as PNG.
    Still(StillArgs),
}

#[derive(Args, Debug)]
pub struct StillArgs {
    /// Destination PNG file.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,

    /// Image size (default 1920x1080).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<SurfaceSize>,

    /// Time to evaluate the field at: seconds (`2.5`) or a duration (`1m 30s`).
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub time: Option<f32>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<SurfaceSize, String> {
    value.parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    if value.trim().is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }
    value.parse::<AntialiasSetting>().map(map_antialias)
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceMode, String> {
    if value.trim().is_empty() {
        return Err("color space must not be empty".to_string());
    }
    value.parse::<ColorSpaceSetting>().map(map_color_space)
}

pub fn parse_gpu_power(value: &str) -> Result<GpuPowerPreference, String> {
    value.parse::<GpuPowerSetting>().map(map_gpu_power)
}

pub fn parse_seconds(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    let seconds = match trimmed.parse::<f32>() {
        Ok(seconds) => seconds,
        Err(_) => humantime::parse_duration(trimmed)
            .map_err(|err| format!("invalid time '{trimmed}': {err}"))?
            .as_secs_f32(),
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("time must be a non-negative number of seconds (got '{trimmed}')"));
    }
    Ok(seconds)
}
