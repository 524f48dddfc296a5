/// Per-tick displacement. Opposite directions cancel; diagonals are not normalized.
fn velocity_for(input: DirectionSignals, speed: f32) -> Vec2 {
    let axis = |negative: bool, positive: bool| -> f32 {
        let mut value = 0.0;
        if negative {
            value -= speed;
        }
        if positive {
            value += speed;
        }
        value
    };
    Vec2::new(axis(input.left, input.right), axis(input.up, input.down))
}

fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

fn within_box(point: Vec2, center: Vec2, half_extents: Vec2) -> bool {
    (point.x - center.x).abs() < half_extents.x && (point.y - center.y).abs() < half_extents.y
}

impl ContainmentRegion {
    pub(crate) fn accepts(&self, point: Vec2) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let a = self.semi_axis_x;
        let b = self.semi_axis_y;
        (dx * dx) / (a * a) + (dy * dy) / (b * b) < self.threshold
    }
}
