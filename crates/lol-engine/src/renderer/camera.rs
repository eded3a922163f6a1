use glam::Vec2;

/// Orthographic view onto the level, in world units. Y-up.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// Optional bounds for camera clamping (min_x, min_y, max_x, max_y).
    pub bounds: Option<[f32; 4]>,
    /// Smoothing factor for camera follow (0.0 = instant, 1.0 = never moves).
    pub smoothing: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new(width / 2.0, height / 2.0),
            bounds: None,
            smoothing: 0.0,
        }
    }

    /// Keep the view inside this world rectangle.
    pub fn set_bounds(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.bounds = Some([min_x, min_y, max_x, max_y]);
        self.clamp_to_bounds();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// 0.0 = instant snap, 0.9 = very smooth/slow.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Move toward `target`. Called each frame with the followed entity's position.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.center += (target - self.center) * lerp_factor;
            self.clamp_to_bounds();
        }
    }

    fn clamp_to_bounds(&mut self) {
        if let Some([min_x, min_y, max_x, max_y]) = self.bounds {
            let half_w = self.width / 2.0;
            let half_h = self.height / 2.0;

            // A view wider than the bounds stays centred on them.
            self.center.x = if self.width >= max_x - min_x {
                (min_x + max_x) / 2.0
            } else {
                self.center.x.clamp(min_x + half_w, max_x - half_w)
            };
            self.center.y = if self.height >= max_y - min_y {
                (min_y + max_y) / 2.0
            } else {
                self.center.y.clamp(min_y + half_h, max_y - half_h)
            };
        }
    }

    /// Map a pixel position (origin top-left, Y-down) on a viewport of
    /// `viewport` pixels to world coordinates.
    pub fn screen_to_world(&self, screen: Vec2, viewport: Vec2) -> Vec2 {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return self.center;
        }
        let nx = screen.x / viewport.x - 0.5;
        let ny = 0.5 - screen.y / viewport.y;
        self.center + Vec2::new(nx * self.width, ny * self.height)
    }

    /// Whether a world-space rectangle overlaps the view.
    pub fn is_rect_visible(&self, rect_center: Vec2, rect_half_size: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let offset = (rect_center - self.center).abs();
        offset.x <= half.x + rect_half_size.x && offset.y <= half.y + rect_half_size.y
    }
}
