//! Device acquisition for offscreen field rendering.

use crate::surface::Viewport;
use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, PowerPreference, Queue};

/// Errors raised while acquiring a GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

/// One device and queue, shared by every field renderer on the page.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Acquire a GPU, preferring the low-power adapter.
    pub async fn new() -> Result<Self, GpuError> {
        Self::with_power_preference(PowerPreference::LowPower).await
    }

    pub async fn with_power_preference(power_preference: PowerPreference) -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sparkle-field"),
                required_features: wgpu::Features::empty(),
                // Downlevel limits, but allow the largest targets the adapter supports.
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        Ok(Self {
            instance,
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest render target edge the device accepts.
    pub fn max_target_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Shrink `viewport` to fit the device's texture limit, keeping its aspect ratio.
    pub fn fit_viewport(&self, viewport: Viewport) -> Viewport {
        fit_to_limit(viewport, self.max_target_size())
    }
}

pub(crate) fn fit_to_limit(viewport: Viewport, limit: u32) -> Viewport {
    let longest = viewport.width.max(viewport.height);
    if longest <= limit {
        return viewport;
    }
    let scale = limit as f64 / longest as f64;
    let fitted = Viewport {
        width: ((viewport.width as f64 * scale).floor() as u32).clamp(1, limit),
        height: ((viewport.height as f64 * scale).floor() as u32).clamp(1, limit),
    };
    log::warn!(
        "Render target {}x{} exceeds device limit {}, using {}x{}",
        viewport.width,
        viewport.height,
        limit,
        fitted.width,
        fitted.height
    );
    fitted
}
