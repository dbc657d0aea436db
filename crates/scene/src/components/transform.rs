use foundation::math::Vec3;

/// Node placement: translation, Euler rotation (radians, XYZ order) and
/// per-axis scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, s: f64) -> Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Heading around the vertical axis.
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
