//! Axis-aligned bounding rectangle.

use glam::Vec2;

/// Axis-aligned rectangle stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Degenerate zero-size rectangle at the origin.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Rectangle containing a single point.
    pub fn point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Expand to contain `p`.
    pub fn expanded(&self, p: Vec2) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Fold a point into an optional accumulator, used for min/max
    /// bounds computation over vertex streams.
    pub fn fold(acc: Option<Self>, p: Vec2) -> Option<Self> {
        Some(match acc {
            None => Self::point(p),
            Some(rect) => rect.expanded(p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_over_points() {
        let points = [
            Vec2::new(1.0, 2.0),
            Vec2::new(-3.0, 0.5),
            Vec2::new(2.0, -1.0),
        ];
        let rect = points
            .iter()
            .fold(None, |acc, p| Rect::fold(acc, *p))
            .unwrap();
        assert_eq!(rect.min, Vec2::new(-3.0, -1.0));
        assert_eq!(rect.max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_empty_fold_is_zero() {
        let rect: Option<Rect> = [].iter().fold(None, |acc, p: &Vec2| Rect::fold(acc, *p));
        assert_eq!(rect.unwrap_or(Rect::ZERO), Rect::ZERO);
    }
}
