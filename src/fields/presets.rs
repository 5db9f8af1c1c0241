//! Built-in field presets.
//!
//! One hero layer of small rising sparkles and two section layers of
//! large additive flares.

use super::{AnimationStyle, BlendMode, ParticleFieldConfig, Rgb, ShadingStyle};

pub const HERO_CANVAS: &str = "hero-canvas";
pub const COLUMN_CANVAS: &str = "column-canvas";
pub const ACCESS_CANVAS: &str = "access-canvas";

const SPARKLE_PALETTE: [Rgb; 3] = [
    Rgb::from_hex(0xffffff),
    Rgb::from_hex(0xccffcc),
    Rgb::from_hex(0xffffcc),
];

const FLARE_PALETTE: [Rgb; 4] = [
    Rgb::from_hex(0xffffff),
    Rgb::from_hex(0xffff00), // yellow
    Rgb::from_hex(0xffa500), // orange
    Rgb::from_hex(0xadff2f), // green-yellow
];

fn flare_field(surface_id: &str) -> ParticleFieldConfig {
    ParticleFieldConfig {
        surface_id: surface_id.to_string(),
        particle_count: 50,
        color_palette: FLARE_PALETTE.to_vec(),
        size_range: [10.0, 40.0],
        animation_style: AnimationStyle::Expanding,
        blend_mode: BlendMode::Additive,
        shading_style: ShadingStyle::Flare,
    }
}

/// The default set of fields, in registration order.
///
/// # Example
/// ```
/// use sparkle_field::fields::{sparkle_presets, AnimationStyle};
///
/// let presets = sparkle_presets();
/// assert_eq!(presets[0].animation_style, AnimationStyle::Rising);
/// ```
pub fn sparkle_presets() -> Vec<ParticleFieldConfig> {
    vec![
        ParticleFieldConfig {
            surface_id: HERO_CANVAS.to_string(),
            particle_count: 2000,
            color_palette: SPARKLE_PALETTE.to_vec(),
            size_range: [0.5, 2.5],
            animation_style: AnimationStyle::Rising,
            blend_mode: BlendMode::Normal,
            shading_style: ShadingStyle::Soft,
        },
        flare_field(COLUMN_CANVAS),
        flare_field(ACCESS_CANVAS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in sparkle_presets() {
            assert!(config.validate().is_ok(), "{} should be valid", config.surface_id);
        }
    }

    #[test]
    fn test_preset_surface_ids_are_unique() {
        let presets = sparkle_presets();
        let mut ids: Vec<_> = presets.iter().map(|c| c.surface_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), presets.len());
    }

    #[test]
    fn test_flare_presets_use_additive_flare() {
        for config in sparkle_presets().iter().skip(1) {
            assert_eq!(config.particle_count, 50);
            assert_eq!(config.blend_mode, BlendMode::Additive);
            assert_eq!(config.shading_style, ShadingStyle::Flare);
        }
    }
}
