use glam::Vec3;
use image::{Rgba, RgbaImage};

pub const MATCAP_COUNT: u32 = 6;
pub const MATCAP_SIZE: u32 = 64;

/// Matcap used for the title text
pub const TEXT_MATCAP: u8 = 2;

struct Palette {
    base: Vec3,
    highlight: Vec3,
    shininess: f32,
    ambient: f32,
}

const PALETTES: [Palette; MATCAP_COUNT as usize] = [
    Palette { base: Vec3::new(0.55, 0.55, 0.58), highlight: Vec3::new(1.0, 1.0, 1.0), shininess: 24.0, ambient: 0.25 },
    Palette { base: Vec3::new(0.85, 0.62, 0.30), highlight: Vec3::new(1.0, 0.95, 0.8), shininess: 40.0, ambient: 0.20 },
    Palette { base: Vec3::new(0.20, 0.45, 0.85), highlight: Vec3::new(0.9, 0.95, 1.0), shininess: 16.0, ambient: 0.30 },
    Palette { base: Vec3::new(0.80, 0.25, 0.35), highlight: Vec3::new(1.0, 0.9, 0.9), shininess: 32.0, ambient: 0.20 },
    Palette { base: Vec3::new(0.30, 0.75, 0.45), highlight: Vec3::new(0.95, 1.0, 0.95), shininess: 12.0, ambient: 0.35 },
    Palette { base: Vec3::new(0.12, 0.12, 0.14), highlight: Vec3::new(0.8, 0.8, 0.85), shininess: 64.0, ambient: 0.15 },
];

/// Shade one texel of matcap `number` (1-based); `u`, `v` in [0, 1]
pub fn shade(number: u8, u: f32, v: f32) -> Vec3 {
    let palette = &PALETTES[(number.clamp(1, MATCAP_COUNT as u8) - 1) as usize];
    let x = u * 2.0 - 1.0;
    let y = 1.0 - v * 2.0;
    let r2 = x * x + y * y;
    if r2 > 1.0 {
        return palette.base * palette.ambient;
    }
    let normal = Vec3::new(x, y, (1.0 - r2).sqrt());
    let light = Vec3::new(-0.4, 0.5, 0.75).normalize();
    let half = (light + Vec3::Z).normalize();

    let diffuse = normal.dot(light).max(0.0);
    let specular = normal.dot(half).max(0.0).powf(palette.shininess);
    let rim = (1.0 - normal.z).powi(3) * 0.3;

    let color = palette.base * (palette.ambient + diffuse * (1.0 - palette.ambient))
        + palette.highlight * specular
        + palette.highlight * rim;
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Matcap `number` (1..=6) as an image indexed by view-space normal
pub fn generate(number: u8, size: u32) -> RgbaImage {
    let scale = 1.0 / (size.max(2) - 1) as f32;
    RgbaImage::from_fn(size, size, |px, py| {
        let c = shade(number, px as f32 * scale, py as f32 * scale);
        Rgba([
            (c.x * 255.0).round() as u8,
            (c.y * 255.0).round() as u8,
            (c.z * 255.0).round() as u8,
            255,
        ])
    })
}

/// All matcaps as consecutive RGBA layers, ready for a texture array upload
pub fn layers(size: u32) -> Vec<RgbaImage> {
    (1..=MATCAP_COUNT as u8).map(|n| generate(n, size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_have_expected_shape() {
        let layers = layers(16);
        assert_eq!(layers.len(), MATCAP_COUNT as usize);
        for layer in &layers {
            assert_eq!(layer.dimensions(), (16, 16));
            assert_eq!(layer.as_raw().len(), 16 * 16 * 4);
        }
    }

    #[test]
    fn test_lit_side_brighter_than_shadow_side() {
        for n in 1..=MATCAP_COUNT as u8 {
            let lit = shade(n, 0.3, 0.3);
            let shadow = shade(n, 0.8, 0.8);
            assert!(lit.length() > shadow.length(), "matcap {n}");
        }
    }

    #[test]
    fn test_out_of_range_number_is_clamped() {
        assert_eq!(shade(0, 0.5, 0.5), shade(1, 0.5, 0.5));
        assert_eq!(shade(9, 0.5, 0.5), shade(6, 0.5, 0.5));
    }
}
