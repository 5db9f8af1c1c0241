//! Bind group layouts for the particle pipeline.

use std::num::NonZeroU64;
use wgpu::{BindGroupLayout, BindGroupLayoutEntry, Device, ShaderStages};

/// Collects bind group layout entries.
pub struct BindGroupLayoutBuilder {
    label: &'static str,
    entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Vec::new(),
        }
    }

    /// Uniform buffer holding exactly one `T`; binding size is validated against it.
    pub fn uniform<T: bytemuck::Pod>(mut self, binding: u32, visibility: ShaderStages) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        });
        self
    }

    pub fn build(self, device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(self.label),
            entries: &self.entries,
        })
    }
}

/// Camera and viewport uniforms, read by the vertex stage only.
pub fn create_particle_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("particle_bind_group_layout")
        .uniform::<super::renderer::ParticleUniforms>(0, ShaderStages::VERTEX)
        .build(device)
}
