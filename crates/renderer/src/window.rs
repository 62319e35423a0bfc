use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::FrameScheduler;
use crate::types::RendererConfig;

const SOFTWARE_FPS_CAP: f32 = 15.0;

/// Window plus the GPU state drawing into it.
struct WindowState {
    // Declared before `window` so the surface is dropped first.
    gpu: GpuState,
    window: Arc<Window>,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)
            .context("failed to initialise window renderer")?;
        Ok(Self { gpu, window })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        match self.gpu.resize(new_size) {
            Some(viewport) => {
                tracing::debug!(
                    width = viewport.width(),
                    height = viewport.height(),
                    "viewport resized"
                );
            }
            None => tracing::trace!(?new_size, "resize ignored"),
        }
    }

    /// Draws one frame. Returns `false` when the loop should stop.
    fn render_frame(&mut self) -> bool {
        match self.gpu.render() {
            Ok(_) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated; reconfiguring");
                self.gpu.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; exiting");
                false
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout; retrying next frame");
                true
            }
            Err(other) => {
                warn!("surface error: {other:?}; retrying next frame");
                true
            }
        }
    }
}

/// Frame cap for this session: the user's choice, else a fixed cap on
/// software rasterizers, else none.
fn effective_fps(requested: Option<f32>, is_software: bool) -> Option<f32> {
    match requested {
        Some(fps) => Some(fps),
        None if is_software => Some(SOFTWARE_FPS_CAP),
        None => None,
    }
}

/// Opens the window and animates the field until it is closed.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let mut builder = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size);
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = builder
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, &config)?;

    let profile = state.gpu.adapter_profile().clone();
    let target_fps = effective_fps(config.target_fps, profile.is_software());
    if config.target_fps.is_none() {
        if let Some(cap) = target_fps {
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                cap,
                "software rasterizer detected; capping to {} FPS (override with --fps)",
                cap
            );
        }
    }
    let mut scheduler = FrameScheduler::new(target_fps);

    let size = state.gpu.size();
    info!(
        width = size.width,
        height = size.height,
        adapter = %profile.name,
        fps_cap = ?scheduler.interval().map(|interval| 1.0 / interval.as_secs_f32()),
        "glowfield running"
    );
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        info!("window closed");
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::RedrawRequested => {
                        if !state.render_frame() {
                            elwt.exit();
                            return;
                        }
                        scheduler.mark_rendered(Instant::now());
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if scheduler.ready_for_frame(now) {
                    tracing::trace!("scheduler: issuing redraw now");
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = scheduler.next_deadline() {
                    let ms = deadline.saturating_duration_since(now).as_millis();
                    tracing::trace!(deadline_ms = ms, "scheduler: waiting until next frame");
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
