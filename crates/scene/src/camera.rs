use foundation::math::Vec3;

/// Perspective camera pose: where it sits and what it looks at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Unit view direction, `None` when position and target coincide.
    pub fn forward(&self) -> Option<Vec3> {
        (self.look_at - self.position).normalized()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.72, 3.52, 60.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::Camera;
    use foundation::math::Vec3;

    #[test]
    fn forward_points_at_target() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        assert_eq!(cam.forward(), Some(Vec3::new(0.0, 0.0, -1.0)));
        assert_eq!(Camera::new(Vec3::ZERO, Vec3::ZERO).forward(), None);
    }
}
