use anyhow::{bail, Context, Result};
use fieldconfig::GlowConfig;
use renderer::{RenderMode, RendererConfig};
use shading::FieldParams;

use crate::bindings::{map_antialias, map_color_space, map_gpu_power};
use crate::cli::{Cli, Command, CommonArgs, StillArgs, WindowArgs};

const DEFAULT_SURFACE: (u32, u32) = (1920, 1080);

/// Merges command line, config file and defaults, in that order of
/// precedence, into the renderer configuration.
pub fn build_renderer_config(cli: &Cli, file: Option<&GlowConfig>) -> Result<RendererConfig> {
    let field = resolve_field(&cli.common, file)?;
    match &cli.command {
        Some(Command::Still(still)) => Ok(still_config(still, file, field)),
        None => window_config(&cli.window, file, field),
    }
}

fn resolve_field(common: &CommonArgs, file: Option<&GlowConfig>) -> Result<FieldParams> {
    let mut field = file.map(GlowConfig::field_params).unwrap_or_default();
    if let Some(drift_rate) = common.drift_rate {
        field.drift_rate = drift_rate;
    }
    if let Some(octaves) = common.octaves {
        field.octaves = octaves;
    }
    field.validate().context("invalid field parameters")?;
    Ok(field)
}

fn window_config(
    args: &WindowArgs,
    file: Option<&GlowConfig>,
    field: FieldParams,
) -> Result<RendererConfig> {
    let section = file.map(|config| &config.window);
    let defaults = RendererConfig::default();

    let surface_size = args
        .size
        .or_else(|| section.and_then(|s| s.size))
        .map(|size| size.as_tuple())
        .unwrap_or(DEFAULT_SURFACE);

    let target_fps = match args.fps.or_else(|| section.and_then(|s| s.fps)) {
        Some(fps) if !fps.is_finite() || fps < 0.0 => bail!("fps must be >= 0 (got {fps})"),
        requested => requested,
    };

    Ok(RendererConfig {
        surface_size,
        mode: RenderMode::Windowed,
        fullscreen: args.fullscreen || section.and_then(|s| s.fullscreen).unwrap_or(false),
        target_fps,
        antialiasing: args
            .antialias
            .or_else(|| section.and_then(|s| s.antialias).map(map_antialias))
            .unwrap_or(defaults.antialiasing),
        color_space: args
            .color_space
            .or_else(|| section.and_then(|s| s.color_space).map(map_color_space))
            .unwrap_or(defaults.color_space),
        gpu_power: args
            .gpu_power
            .or_else(|| section.and_then(|s| s.gpu_power).map(map_gpu_power))
            .unwrap_or(defaults.gpu_power),
        field,
        ..defaults
    })
}

fn still_config(args: &StillArgs, file: Option<&GlowConfig>, field: FieldParams) -> RendererConfig {
    let section = file.map(|config| &config.still);

    let surface_size = args
        .size
        .or_else(|| section.and_then(|s| s.size))
        .map(|size| size.as_tuple())
        .unwrap_or(DEFAULT_SURFACE);
    let time = args
        .time
        .or_else(|| section.and_then(|s| s.time).map(|time| time.as_secs_f32()))
        .unwrap_or(0.0);

    RendererConfig {
        surface_size,
        mode: RenderMode::Still {
            time,
            output: args.output.clone(),
        },
        field,
        ..RendererConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use renderer::{Antialiasing, ColorSpaceMode, GpuPowerPreference};
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["glowfield"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse cli")
    }

    fn config(input: &str) -> GlowConfig {
        GlowConfig::from_toml_str(input).expect("parse config")
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let resolved = build_renderer_config(&cli(&[]), None).expect("resolve");
        assert_eq!(resolved.surface_size, (1920, 1080));
        assert_eq!(resolved.mode, RenderMode::Windowed);
        assert_eq!(resolved.target_fps, None);
        assert_eq!(resolved.field, FieldParams::default());
        assert!(!resolved.fullscreen);
    }

    #[test]
    fn file_values_apply_when_flags_are_absent() {
        let file = config(
            r#"
version = 1
[window]
size = "800x600"
fullscreen = true
fps = 24
antialias = "off"
color_space = "linear"
gpu_power = "high"
[field]
octaves = 3
"#,
        );
        let resolved = build_renderer_config(&cli(&[]), Some(&file)).expect("resolve");
        assert_eq!(resolved.surface_size, (800, 600));
        assert!(resolved.fullscreen);
        assert_eq!(resolved.target_fps, Some(24.0));
        assert_eq!(resolved.antialiasing, Antialiasing::Off);
        assert_eq!(resolved.color_space, ColorSpaceMode::Linear);
        assert_eq!(resolved.gpu_power, GpuPowerPreference::High);
        assert_eq!(resolved.field.octaves, 3);
    }

    #[test]
    fn flags_override_file_values() {
        let file = config(
            r#"
version = 1
[window]
size = "800x600"
fps = 24
[field]
octaves = 3
drift_rate = 0.5
"#,
        );
        let resolved = build_renderer_config(
            &cli(&["--size", "640x480", "--fps", "0", "--octaves", "8"]),
            Some(&file),
        )
        .expect("resolve");
        assert_eq!(resolved.surface_size, (640, 480));
        assert_eq!(resolved.target_fps, Some(0.0));
        assert_eq!(resolved.field.octaves, 8);
        assert_eq!(resolved.field.drift_rate, 0.5);
    }

    #[test]
    fn explicit_zero_fps_is_kept_as_uncapped_choice() {
        let file = config("version = 1\n[window]\nfps = 0");
        let resolved = build_renderer_config(&cli(&[]), Some(&file)).expect("resolve");
        assert_eq!(resolved.target_fps, Some(0.0));

        let resolved = build_renderer_config(&cli(&[]), None).expect("resolve");
        assert_eq!(resolved.target_fps, None);
    }

    #[test]
    fn invalid_field_override_is_rejected() {
        let err = build_renderer_config(&cli(&["--octaves", "40"]), None).unwrap_err();
        assert!(format!("{err:#}").contains("octaves"));
    }

    #[test]
    fn negative_fps_is_rejected() {
        let err = build_renderer_config(&cli(&["--fps=-3"]), None).unwrap_err();
        assert!(err.to_string().contains("fps"));
    }

    #[test]
    fn still_uses_still_section() {
        let file = config(
            r#"
version = 1
[window]
size = "800x600"
[still]
time = "2.5s"
size = "320x200"
"#,
        );
        let resolved =
            build_renderer_config(&cli(&["still", "--output", "out.png"]), Some(&file))
                .expect("resolve");
        assert_eq!(resolved.surface_size, (320, 200));
        assert_eq!(
            resolved.mode,
            RenderMode::Still {
                time: 2.5,
                output: PathBuf::from("out.png"),
            }
        );
    }

    #[test]
    fn still_flags_win() {
        let resolved = build_renderer_config(
            &cli(&["still", "-o", "a.png", "--size", "64x48", "--time", "10"]),
            None,
        )
        .expect("resolve");
        assert_eq!(resolved.surface_size, (64, 48));
        assert!(matches!(resolved.mode, RenderMode::Still { time, .. } if time == 10.0));
    }
}
