use macroquad::camera::Camera2D;
use macroquad::math::{Rect, Vec2};

/// 2D camera in world pixels. `center` is the point shown mid-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            center: viewport / 2.0,
            viewport,
        }
    }

    pub fn follow(&mut self, target: Vec2) {
        self.center = target;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Keep the view inside a `world` sized area. Worlds smaller than the
    /// viewport are centred.
    pub fn clamp_to(&mut self, world: Vec2) {
        let half = self.viewport / 2.0;
        self.center.x = if world.x <= self.viewport.x {
            world.x / 2.0
        } else {
            self.center.x.clamp(half.x, world.x - half.x)
        };
        self.center.y = if world.y <= self.viewport.y {
            world.y / 2.0
        } else {
            self.center.y.clamp(half.y, world.y - half.y)
        };
    }

    /// Top-left and bottom-right corners of the visible world area.
    pub fn view_bounds(&self) -> (Vec2, Vec2) {
        let half = self.viewport / 2.0;
        (self.center - half, self.center + half)
    }

    pub fn view_rect(&self) -> Rect {
        let (min, _) = self.view_bounds();
        Rect::new(min.x, min.y, self.viewport.x, self.viewport.y)
    }

    /// macroquad camera showing exactly [`Camera::view_rect`].
    pub fn to_camera2d(&self) -> Camera2D {
        Camera2D::from_display_rect(self.view_rect())
    }
}
