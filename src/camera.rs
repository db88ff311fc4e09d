use glam::{Mat4, Vec2, Vec4};

/// Orthographic view of the board's world square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Projection {
    /// World square plus `margin` on every side. Used before the first resize.
    pub fn with_margin(margin: f32) -> Self {
        Self {
            left: -1.0 - margin,
            right: 1.0 + margin,
            bottom: -1.0 - margin,
            top: 1.0 + margin,
        }
    }

    /// Bounds that keep the board square in a `width` x `height` viewport,
    /// stretching the longer axis and padding both by `buffer`.
    /// `None` for a zero-sized viewport.
    pub fn fit(width: u32, height: u32, buffer: f32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let aspect = width as f32 / height as f32;

        let projection = if aspect > 1.0 {
            // wider than tall
            Self {
                left: -aspect - buffer,
                right: aspect + buffer,
                bottom: -1.0 - buffer,
                top: 1.0 + buffer,
            }
        } else {
            Self {
                left: -1.0 - buffer,
                right: 1.0 + buffer,
                bottom: -1.0 / aspect - buffer,
                top: 1.0 / aspect + buffer,
            }
        };
        Some(projection)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, -1.0, 1.0)
    }

    /// Map a cursor position in physical pixels to world space.
    pub fn screen_to_world(&self, x: f32, y: f32, width: u32, height: u32) -> Vec2 {
        let ndc_x = (2.0 * x) / width as f32 - 1.0;
        let ndc_y = 1.0 - (2.0 * y) / height as f32;

        let world = self.matrix().inverse() * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        Vec2::new(world.x, world.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_startup_margin() {
        let p = Projection::with_margin(0.2);
        assert!(close(p.left, -1.2) && close(p.right, 1.2));
        assert!(close(p.bottom, -1.2) && close(p.top, 1.2));
    }

    #[test]
    fn test_wide_window_stretches_horizontally() {
        let p = Projection::fit(1600, 800, 0.05).unwrap();
        assert!(close(p.right, 2.05) && close(p.left, -2.05));
        assert!(close(p.top, 1.05) && close(p.bottom, -1.05));
    }

    #[test]
    fn test_tall_window_stretches_vertically() {
        let p = Projection::fit(500, 1000, 0.05).unwrap();
        assert!(close(p.right, 1.05) && close(p.left, -1.05));
        assert!(close(p.top, 2.05) && close(p.bottom, -2.05));
    }

    #[test]
    fn test_square_window_uses_tall_branch() {
        let p = Projection::fit(640, 640, 0.05).unwrap();
        assert!(close(p.right, 1.05) && close(p.top, 1.05));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(Projection::fit(0, 600, 0.05).is_none());
        assert!(Projection::fit(800, 0, 0.05).is_none());
    }

    #[test]
    fn test_matrix_is_invertible() {
        for (w, h) in [(1, 1), (800, 600), (600, 800), (3840, 20), (20, 3840)] {
            let m = Projection::fit(w, h, 0.05).unwrap().matrix();
            assert!(m.determinant().abs() > f32::EPSILON, "{w}x{h}");
        }
    }

    #[test]
    fn test_screen_center_is_world_origin() {
        let p = Projection::fit(800, 600, 0.05).unwrap();
        let world = p.screen_to_world(400.0, 300.0, 800, 600);
        assert!(close(world.x, 0.0) && close(world.y, 0.0));
    }

    #[test]
    fn test_screen_corners_hit_bounds() {
        let p = Projection::fit(800, 600, 0.05).unwrap();
        let top_left = p.screen_to_world(0.0, 0.0, 800, 600);
        assert!(close(top_left.x, p.left) && close(top_left.y, p.top));
        let bottom_right = p.screen_to_world(800.0, 600.0, 800, 600);
        assert!(close(bottom_right.x, p.right) && close(bottom_right.y, p.bottom));
    }

    #[test]
    fn test_world_round_trip_through_matrix() {
        let p = Projection::with_margin(0.2);
        let m = p.matrix();
        let clip = m * Vec4::new(0.5, -0.25, 0.0, 1.0);
        // clip -> screen for a 600x600 window
        let x = (clip.x + 1.0) * 300.0;
        let y = (1.0 - clip.y) * 300.0;
        let world = p.screen_to_world(x, y, 600, 600);
        assert!(close(world.x, 0.5) && close(world.y, -0.25));
    }
}
