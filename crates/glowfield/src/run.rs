use anyhow::{Context, Result};
use fieldconfig::GlowConfig;
use renderer::{RenderMode, Renderer};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::build_renderer_config;
use crate::cli::Cli;
use crate::paths::AppPaths;

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing();

    let file = load_config(&args)?;
    let config = build_renderer_config(&args, file.as_ref())?;
    match &config.mode {
        RenderMode::Windowed => tracing::info!(
            size = ?config.surface_size,
            fullscreen = config.fullscreen,
            field = ?config.field,
            "starting glowfield"
        ),
        RenderMode::Still { time, output } => tracing::info!(
            size = ?config.surface_size,
            time,
            output = %output.display(),
            "rendering still frame"
        ),
    }

    Renderer::new(config).run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(args: &Cli) -> Result<Option<GlowConfig>> {
    if let Some(path) = args.common.config.as_ref() {
        let config = GlowConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok(Some(config));
    }

    let paths = AppPaths::discover()?;
    let path = paths.config_file();
    if !path.exists() {
        tracing::debug!(
            config_dir = %paths.config_dir().display(),
            "no configuration file; using defaults"
        );
        return Ok(None);
    }
    let config = GlowConfig::load(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(Some(config))
}
