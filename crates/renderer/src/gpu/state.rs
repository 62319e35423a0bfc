use std::time::{Duration, Instant};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use crate::error::RendererError;
use crate::runtime::{FrameClock, TimeSample};
use crate::scene::{Scene, Viewport};
use crate::types::{AdapterProfile, RendererConfig};

use super::context::GpuContext;
use super::pipeline::FieldPipeline;
use super::quad::{create_quad_buffer, QUAD_VERTEX_COUNT};
use super::uniforms::FieldUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Rolling frame counter flushed to the debug log once per second.
struct FrameStats {
    window_start: Instant,
    frames: u32,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Counts a frame; returns the measured rate when a full window has passed.
    fn record(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

/// Everything needed to draw the field into a window surface.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: FieldPipeline,
    quad: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    multisample_target: Option<MultisampleTarget>,
    scene: Scene,
    stats: FrameStats,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self, RendererError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(
            target,
            initial_size,
            config.antialiasing,
            config.color_space,
            config.gpu_power,
        )?;
        let pipeline = FieldPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
            &config.field,
        )?;
        let quad = create_quad_buffer(&context.device);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("field uniforms"),
            size: std::mem::size_of::<FieldUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("field uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        // The context already clamped to at least 1x1.
        let viewport = Viewport::new(context.size.width, context.size.height).ok_or_else(|| {
            RendererError::SurfaceUnavailable("surface has zero extent".to_string())
        })?;
        let scene = Scene::new(viewport, FrameClock::system());
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(scene.uniforms()));

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        Ok(Self {
            context,
            pipeline,
            quad,
            uniform_buffer,
            uniform_bind_group,
            multisample_target,
            scene,
            stats: FrameStats::new(Instant::now()),
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    /// Resize handler: updates the uniform resolution, the swapchain and the
    /// MSAA target. Degenerate sizes and sizes beyond the adapter's texture
    /// limit leave everything untouched.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) -> Option<Viewport> {
        let profile = &self.context.adapter_profile;
        if !profile.fits(new_size.width, new_size.height) {
            warn!(
                new_width = new_size.width,
                new_height = new_size.height,
                max_dimension = profile.max_texture_dimension,
                old_width = self.context.size.width,
                old_height = self.context.size.height,
                "requested resize exceeds GPU limits; keeping previous size"
            );
            return None;
        }
        let viewport = self.scene.resize(new_size.width, new_size.height)?;
        if self.context.size == PhysicalSize::from(viewport) {
            return Some(viewport);
        }
        self.context.resize(viewport.into());
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
        Some(viewport)
    }

    /// Re-applies the surface configuration after `Lost`/`Outdated`.
    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// One frame: tick the clock, upload the uniform set, draw the quad once,
    /// present.
    pub(crate) fn render(&mut self) -> Result<TimeSample, wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        let sample = self.scene.tick();
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(self.scene.uniforms()),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("field encoder"),
                });
        self.encode_draw(&mut encoder, &view);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        if let Some(fps) = self.stats.record(Instant::now()) {
            debug!(
                fps = fps.round(),
                frame = sample.frame_index,
                time = sample.seconds,
                "render stats"
            );
        }
        Ok(sample)
    }

    fn encode_draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(view)),
            None => (view, None),
        };
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("field pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: attachment_view,
                depth_slice: None,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad.slice(..));
        render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}
