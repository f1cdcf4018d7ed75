use std::f32::consts::{PI, TAU};

use glam::Vec3;

const MIN_POLAR: f32 = 1e-6;
const DELTA_EPSILON: f32 = 1e-6;

/// Orbit the camera around a target with damped rotation and clamped zoom
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 3.0,
            max_distance: 40.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer drag in pixels; a drag across the full viewport height is one turn
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.delta_theta -= TAU * dx / h * self.rotate_speed;
        self.delta_phi -= TAU * dy / h * self.rotate_speed;
    }

    /// Wheel delta; negative scrolls towards the target
    pub fn zoom(&mut self, delta_y: f32) {
        let step = 0.95f32.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.delta_theta == 0.0 && self.delta_phi == 0.0 && self.scale == 1.0
    }

    /// Apply pending rotation and zoom to `eye`. Leaves `eye` untouched when
    /// idle and already within the distance limits.
    pub fn update(&mut self, eye: &mut Vec3) {
        let offset = *eye - self.target;
        let radius = offset.length();
        let in_range = radius >= self.min_distance && radius <= self.max_distance;
        if self.is_idle() && in_range {
            return;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 { (offset.y / radius).clamp(-1.0, 1.0).acos() } else { PI / 2.0 };

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.delta_theta * factor;
        phi = (phi + self.delta_phi * factor).clamp(MIN_POLAR, PI - MIN_POLAR);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        let sin_phi = phi.sin();
        let offset = Vec3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        *eye = self.target + offset;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            if self.delta_theta.abs() < DELTA_EPSILON {
                self.delta_theta = 0.0;
            }
            if self.delta_phi.abs() < DELTA_EPSILON {
                self.delta_phi = 0.0;
            }
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_update_is_noop() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 14.99);
        controls.update(&mut eye);
        assert_eq!(eye, Vec3::new(0.0, 0.0, 14.99));
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 60.0);
        controls.update(&mut eye);
        assert!((eye.length() - 40.0).abs() < 1e-4);

        let mut eye = Vec3::new(0.0, 0.0, 3.5);
        for _ in 0..50 {
            controls.zoom(-1.0);
            controls.update(&mut eye);
        }
        assert!((eye.length() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_preserves_radius_and_settles() {
        let mut controls = OrbitControls::new();
        let mut eye = Vec3::new(0.0, 0.0, 15.0);
        controls.rotate_by_pixels(100.0, 0.0, 600.0);
        controls.update(&mut eye);
        assert!(eye.x.abs() > 0.0);
        assert!((eye.length() - 15.0).abs() < 1e-3);

        for _ in 0..1000 {
            controls.update(&mut eye);
        }
        assert!(controls.is_idle());
    }

    #[test]
    fn test_polar_angle_never_flips_over() {
        let mut controls = OrbitControls { enable_damping: false, ..Default::default() };
        let mut eye = Vec3::new(0.0, 0.0, 10.0);
        controls.rotate_by_pixels(0.0, 10_000.0, 100.0);
        controls.update(&mut eye);
        assert!(eye.y > 0.0);
        assert!((eye.length() - 10.0).abs() < 1e-3);
    }
}
