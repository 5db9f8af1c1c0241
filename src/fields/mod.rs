//! Particle field configuration.
//!
//! A field is one animated sparkle layer bound to one render surface:
//! - Rising: small sparkles drifting upward and wrapping at the top
//! - Expanding: large flares that fade in, then grow while fading out

mod presets;

pub use presets::{sparkle_presets, ACCESS_CANVAS, COLUMN_CANVAS, HERO_CANVAS};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Errors produced while building or validating field configurations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Field has an empty surface id")]
    EmptySurfaceId,
    #[error("Field '{0}' must have at least one particle")]
    NoParticles(String),
    #[error("Field '{0}' has an empty color palette")]
    EmptyPalette(String),
    #[error("Field '{id}' has an invalid size range [{min}, {max}]")]
    InvalidSizeRange { id: String, min: f32, max: f32 },
    #[error("Field '{0}' has a color channel outside 0.0..=1.0")]
    ColorOutOfRange(String),
    #[error("Failed to parse field configs: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read field configs: {0}")]
    Io(#[from] std::io::Error),
}

/// RGB color with channels in `0.0..=1.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0]);

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        ])
    }

    pub fn to_hex_string(&self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        parse_hex_color(&hex)
            .map(Rgb)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {}", hex)))
    }
}

/// Parse hex color to RGB floats (accepts 6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim_start_matches('#');
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some([r, g, b])
}

/// How particles move and fade over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    Rising,
    Expanding,
}

impl AnimationStyle {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rising" | "rise" | "sparkle" => Some(Self::Rising),
            "expanding" | "expand" | "flare" => Some(Self::Expanding),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Expanding => "expanding",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rising => "Sparkles drifting upward, wrapping at the top",
            Self::Expanding => "Flares that fade in, then grow while fading out",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Rising, Self::Expanding]
    }
}

/// How overlapping sprites composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
}

impl BlendMode {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "alpha" => Some(Self::Normal),
            "additive" | "add" => Some(Self::Additive),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Additive => "additive",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Normal, Self::Additive]
    }

    /// Blend state for the particle pipeline's color target.
    pub fn blend_state(&self) -> wgpu::BlendState {
        match self {
            Self::Normal => wgpu::BlendState::ALPHA_BLENDING,
            Self::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Per-pixel shading routine for each sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingStyle {
    /// Hard-edged disc with uniform alpha.
    #[default]
    Soft,
    /// Half-radius disc whose alpha falls off towards the rim.
    Flare,
}

impl ShadingStyle {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soft" | "simple" | "disc" => Some(Self::Soft),
            "flare" | "glow" => Some(Self::Flare),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Flare => "flare",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Soft, Self::Flare]
    }
}

/// Declarative description of one animated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleFieldConfig {
    /// Render surface the field draws into. The field is skipped if it does not exist.
    pub surface_id: String,
    pub particle_count: u32,
    pub color_palette: Vec<Rgb>,
    /// Sprite size range `[min, max]`.
    pub size_range: [f32; 2],
    pub animation_style: AnimationStyle,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub shading_style: ShadingStyle,
}

impl ParticleFieldConfig {
    /// Check the invariants field creation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface_id.trim().is_empty() {
            return Err(ConfigError::EmptySurfaceId);
        }
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles(self.surface_id.clone()));
        }
        if self.color_palette.is_empty() {
            return Err(ConfigError::EmptyPalette(self.surface_id.clone()));
        }
        let [min, max] = self.size_range;
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidSizeRange {
                id: self.surface_id.clone(),
                min,
                max,
            });
        }
        let in_range = self
            .color_palette
            .iter()
            .flat_map(|c| c.0)
            .all(|v| (0.0..=1.0).contains(&v));
        if !in_range {
            return Err(ConfigError::ColorOutOfRange(self.surface_id.clone()));
        }
        Ok(())
    }
}

/// Parse and validate a JSON array of field configurations.
pub fn parse_field_configs(json: &str) -> Result<Vec<ParticleFieldConfig>, ConfigError> {
    let configs: Vec<ParticleFieldConfig> = serde_json::from_str(json)?;
    for config in &configs {
        config.validate()?;
    }
    Ok(configs)
}

/// Load field configurations from a JSON file.
pub fn load_field_configs<P: AsRef<Path>>(path: P) -> Result<Vec<ParticleFieldConfig>, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    parse_field_configs(&json)
}
