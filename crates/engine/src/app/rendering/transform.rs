use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Uniform scale-to-fit of the scene rectangle into the viewport, centered on both axes.
/// Scene coordinates have their origin at the top-left corner with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SceneProjection {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneProjection {
    pub(crate) fn fit(scene_size: Vec2, viewport: Viewport) -> Self {
        let valid_extent = |value: f32| value.is_finite() && value > 0.0;
        if !valid_extent(scene_size.x) || !valid_extent(scene_size.y) {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }

        let scale_x = viewport.width as f32 / scene_size.x;
        let scale_y = viewport.height as f32 / scene_size.y;
        let scale = scale_x.min(scale_y);
        Self {
            scale,
            offset_x: (viewport.width as f32 - scene_size.x * scale) * 0.5,
            offset_y: (viewport.height as f32 - scene_size.y * scale) * 0.5,
        }
    }

    pub(crate) fn to_screen(&self, point: Vec2) -> (f32, f32) {
        (
            point.x * self.scale + self.offset_x,
            point.y * self.scale + self.offset_y,
        )
    }

    pub(crate) fn to_screen_px(&self, point: Vec2) -> (i32, i32) {
        let (x, y) = self.to_screen(point);
        (x.round() as i32, y.round() as i32)
    }

    pub(crate) fn length(&self, scene_length: f32) -> f32 {
        scene_length * self.scale
    }
}
