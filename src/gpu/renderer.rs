//! Offscreen particle field renderer.

use super::{
    context::{fit_to_limit, GpuContext, GpuError},
    layouts::create_particle_layout,
    pipelines::{create_pipeline_layout, SpritePipelineBuilder},
    shading::{PARTICLE_SHADER, POINT_SCALE},
};
use crate::camera::PerspectiveCamera;
use crate::fields::ParticleFieldConfig;
use crate::particles::{ParticleBuffers, ParticleVertex};
use crate::render::{FieldRenderer, RenderBackend};
use crate::surface::Viewport;
use std::sync::Arc;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, Texture, TextureView};

/// Render target format for every field.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Uniform data for the particle shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(super) struct ParticleUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    viewport: [f32; 2],
    point_scale: f32,
    _padding: f32,
}

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32,
    3 => Float32,
];

/// Per-instance layout of [`ParticleVertex`].
pub fn particle_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &PARTICLE_ATTRIBUTES,
    }
}

fn create_target(device: &Device, viewport: Viewport) -> (Texture, TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("field_render_target"),
        size: wgpu::Extent3d {
            width: viewport.width,
            height: viewport.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Row pitch and staging size for copying an RGBA8 target into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReadbackLayout {
    unpadded_row_bytes: u32,
    padded_row_bytes: u32,
    buffer_size: u64,
}

impl ReadbackLayout {
    fn for_viewport(viewport: Viewport) -> Self {
        let unpadded_row_bytes = viewport.width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = unpadded_row_bytes.div_ceil(align) * align;
        Self {
            unpadded_row_bytes,
            padded_row_bytes,
            buffer_size: padded_row_bytes as u64 * viewport.height as u64,
        }
    }
}

/// Renders one field's particles into a transparent offscreen texture.
pub struct GpuFieldRenderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    instance_buffer: Buffer,
    max_particles: usize,
    max_target_size: u32,
    render_texture: Texture,
    render_view: TextureView,
    viewport: Viewport,
}

impl GpuFieldRenderer {
    /// The texture holding the most recently drawn frame.
    pub fn texture(&self) -> &Texture {
        &self.render_texture
    }

    pub fn view(&self) -> &TextureView {
        &self.render_view
    }

    fn read_pixels(&self) -> Option<Vec<u8>> {
        let Viewport { width, height } = self.viewport;

        let ReadbackLayout {
            unpadded_row_bytes,
            padded_row_bytes,
            buffer_size,
        } = ReadbackLayout::for_viewport(self.viewport);

        let readback_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("field_readback_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("field_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.render_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        if let Err(e) = self.device.poll(wgpu::PollType::wait_indefinitely()) {
            log::warn!("Frame readback poll failed: {}", e);
            return None;
        }
        match receiver.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("Frame readback mapping failed: {}", e);
                return None;
            }
            Err(_) => return None,
        }

        let data = buffer_slice.get_mapped_range();

        // Remove row padding if present
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for row in 0..height {
            let start = row as usize * padded_row_bytes as usize;
            let end = start + unpadded_row_bytes as usize;
            pixels.extend_from_slice(&data[start..end]);
        }

        Some(pixels)
    }
}

impl FieldRenderer for GpuFieldRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        let viewport = fit_to_limit(viewport, self.max_target_size);
        if viewport == self.viewport {
            return;
        }
        let (texture, view) = create_target(&self.device, viewport);
        self.render_texture = texture;
        self.render_view = view;
        self.viewport = viewport;
    }

    fn draw(&mut self, camera: &PerspectiveCamera, particles: &ParticleBuffers) {
        let uniforms = ParticleUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            viewport: [self.viewport.width as f32, self.viewport.height as f32],
            point_scale: POINT_SCALE,
            _padding: 0.0,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let count = particles.len().min(self.max_particles);
        if count > 0 {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&particles.vertices()[..count]),
            );
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("field_render_encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.render_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            // 4 vertices per sprite (triangle strip quad), one instance per particle
            render_pass.draw(0..4, 0..count as u32);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn capture(&self) -> Option<Vec<u8>> {
        self.read_pixels()
    }
}

/// wgpu-backed [`RenderBackend`] sharing one device across all fields.
pub struct GpuBackend {
    ctx: Arc<GpuContext>,
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl GpuBackend {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });
        let bind_group_layout = create_particle_layout(&ctx.device);
        let pipeline_layout =
            create_pipeline_layout(&ctx.device, "particle_pipeline_layout", &[&bind_group_layout]);

        Self {
            ctx,
            shader,
            bind_group_layout,
            pipeline_layout,
        }
    }

    /// Acquire a GPU and build a backend on it.
    pub async fn create() -> Result<Self, GpuError> {
        let ctx = GpuContext::new().await?;
        Ok(Self::new(Arc::new(ctx)))
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    /// Build a concrete renderer, keeping access to its texture.
    pub fn create_gpu_renderer(&self, config: &ParticleFieldConfig, viewport: Viewport) -> GpuFieldRenderer {
        let device = &self.ctx.device;

        let pipeline = SpritePipelineBuilder::new("particle_pipeline", &self.shader, &self.pipeline_layout)
            .instances(particle_vertex_layout())
            .shading(config.shading_style)
            .blend_mode(config.blend_mode)
            .format(TARGET_FORMAT)
            .build(device);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_uniforms"),
            size: std::mem::size_of::<ParticleUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_particles = (config.particle_count as usize).max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_instances"),
            size: (std::mem::size_of::<ParticleVertex>() * max_particles) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let max_target_size = self.ctx.max_target_size();
        let viewport = self.ctx.fit_viewport(viewport);
        let (render_texture, render_view) = create_target(device, viewport);

        GpuFieldRenderer {
            device: self.ctx.device.clone(),
            queue: self.ctx.queue.clone(),
            pipeline,
            bind_group,
            uniform_buffer,
            instance_buffer,
            max_particles,
            max_target_size,
            render_texture,
            render_view,
            viewport,
        }
    }
}

impl RenderBackend for GpuBackend {
    fn create_renderer(&self, config: &ParticleFieldConfig, viewport: Viewport) -> Box<dyn FieldRenderer> {
        Box::new(self.create_gpu_renderer(config, viewport))
    }
}
