//! Input state fed into the scene
//!
//! Pointer position and scroll progress are the only inputs the crystal scene
//! reacts to. Both are normalized here, so the scene never sees window pixels.

pub mod scroll;

pub use scroll::{ScrollMetrics, ScrollSource};

use crate::foundation::math::{utils, Vec2};

/// Pointer position normalized to [-1, 1] per axis
///
/// `x` grows to the right and `y` grows upward; (0, 0) is the viewport center.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    x: f32,
    y: f32,
}

impl PointerState {
    /// Pointer at the viewport center
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    /// Create from normalized coordinates
    ///
    /// Values are clamped to [-1, 1]; non-finite components become 0.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: utils::finite_or(x, 0.0).clamp(-1.0, 1.0),
            y: utils::finite_or(y, 0.0).clamp(-1.0, 1.0),
        }
    }

    /// Create from a window-space pixel position (origin top left, y down)
    pub fn from_window(px: f32, py: f32, width: f32, height: f32) -> Self {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Pointer over degenerate viewport {}x{}", width, height);
            return Self::CENTER;
        }
        Self::new((px / width) * 2.0 - 1.0, -((py / height) * 2.0 - 1.0))
    }

    /// Horizontal position
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Both axes as a vector
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pointer_is_clamped() {
        let pointer = PointerState::new(3.0, -7.5);
        assert_eq!(pointer.x(), 1.0);
        assert_eq!(pointer.y(), -1.0);

        let pointer = PointerState::new(f32::NAN, f32::INFINITY);
        assert_eq!(pointer, PointerState::CENTER);
    }

    #[test]
    fn test_from_window_is_y_up() {
        let top_left = PointerState::from_window(0.0, 0.0, 800.0, 600.0);
        assert_relative_eq!(top_left.x(), -1.0);
        assert_relative_eq!(top_left.y(), 1.0);

        let center = PointerState::from_window(400.0, 300.0, 800.0, 600.0);
        assert_relative_eq!(center.to_vec2(), Vec2::zeros());

        assert_eq!(PointerState::from_window(10.0, 10.0, 0.0, 600.0), PointerState::CENTER);
    }
}
