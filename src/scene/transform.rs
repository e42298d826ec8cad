//! 2D transform component.

use glam::{Mat4, Quat, Vec2};

/// Transform for positioning nodes in 2D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2d {
    pub position: Vec2,
    /// Rotation around the Z axis, radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_position_scale(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Get the model matrix for this transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::from_rotation_z(self.rotation),
            self.position.extend(0.0),
        )
    }

    /// Transform a local-space point into world space.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix().transform_point3(point.extend(0.0)).truncate()
    }

    /// Translate by an offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_transform() {
        let t = Transform2d::from_position_scale(Vec2::new(10.0, 0.0), Vec2::splat(2.0));
        let p = t.transform_point(Vec2::new(1.0, 1.0));
        assert!((p - Vec2::new(12.0, 2.0)).length() < 1e-5);
    }
}
