//! Sprite pipeline construction.
//!
//! Every field gets its own pipeline because blend state and fragment entry
//! point are baked in at creation time.

use super::shading::VERTEX_ENTRY;
use crate::fields::{BlendMode, ShadingStyle};
use wgpu::{
    BindGroupLayout, Device, PipelineLayout, RenderPipeline, ShaderModule, TextureFormat,
    VertexBufferLayout,
};

/// Builder for instanced point-sprite pipelines.
pub struct SpritePipelineBuilder<'a> {
    label: &'static str,
    shader: &'a ShaderModule,
    layout: &'a PipelineLayout,
    instances: Option<VertexBufferLayout<'static>>,
    shading: ShadingStyle,
    blend_mode: BlendMode,
    format: TextureFormat,
}

impl<'a> SpritePipelineBuilder<'a> {
    pub fn new(label: &'static str, shader: &'a ShaderModule, layout: &'a PipelineLayout) -> Self {
        Self {
            label,
            shader,
            layout,
            instances: None,
            shading: ShadingStyle::default(),
            blend_mode: BlendMode::default(),
            format: TextureFormat::Rgba8Unorm,
        }
    }

    /// Per-instance particle attributes.
    pub fn instances(mut self, layout: VertexBufferLayout<'static>) -> Self {
        self.instances = Some(layout);
        self
    }

    pub fn shading(mut self, shading: ShadingStyle) -> Self {
        self.shading = shading;
        self
    }

    pub fn blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the pipeline. Quads are 4-vertex strips; no depth attachment, so
    /// sprites composite in buffer order.
    pub fn build(self, device: &Device) -> RenderPipeline {
        let buffers: Vec<VertexBufferLayout<'static>> = self.instances.into_iter().collect();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: self.shader,
                entry_point: Some(self.shading.fragment_entry()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(self.blend_mode.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

pub fn create_pipeline_layout(
    device: &Device,
    label: &'static str,
    layouts: &[&BindGroupLayout],
) -> PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: layouts,
        immediate_size: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::layouts::create_particle_layout;
    use crate::gpu::renderer::particle_vertex_layout;
    use crate::gpu::shading::PARTICLE_SHADER;
    use crate::gpu::GpuContext;

    #[tokio::test]
    async fn test_every_style_and_blend_builds() {
        let Ok(ctx) = GpuContext::new().await else {
            return;
        };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });
        let bind_group_layout = create_particle_layout(&ctx.device);
        let layout = create_pipeline_layout(&ctx.device, "test_layout", &[&bind_group_layout]);

        for shading in ShadingStyle::all() {
            for blend_mode in BlendMode::all() {
                let _pipeline = SpritePipelineBuilder::new("test_pipeline", &shader, &layout)
                    .instances(particle_vertex_layout())
                    .shading(*shading)
                    .blend_mode(*blend_mode)
                    .build(&ctx.device);
            }
        }
    }
}
