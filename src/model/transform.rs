use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation (XYZ order, radians) and scale of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    pub fn set_uniform_rotation(&mut self, angle: f32) {
        self.rotation = Vec3::splat(angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix() {
        assert!(Transform::default().matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_translation_and_scale() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.set_uniform_scale(2.0);
        let p = t.matrix().transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 4.0, 5.0), 1e-6));
    }

    #[test]
    fn test_rotation_x_quarter_turn() {
        let t = Transform {
            rotation: Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ..Default::default()
        };
        let p = t.matrix().transform_point3(Vec3::Y);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-6));
    }
}
