use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Entity, RenderableKind, SceneWorld, ShapeKind, ShapeLayer, Vec2};

use super::raster::{fill_circle, fill_ellipse, fill_frame, fill_rect};
use super::sprites::{draw_sprite_stretched, SpriteCache};
use super::text::{draw_banner, draw_hud, draw_overlay, OverlayData};
use super::transform::SceneProjection;
use super::{Viewport, PLACEHOLDER_BODY_COLOR, PLACEHOLDER_HEAD_COLOR};

const LETTERBOX_COLOR: [u8; 4] = [8, 8, 12, 255];
const PLACEHOLDER_BODY_RADIUS: f32 = 12.0;
const PLACEHOLDER_BODY_OFFSET_Y: f32 = -6.0;
const PLACEHOLDER_HEAD_RADIUS: f32 = 8.0;
const PLACEHOLDER_HEAD_OFFSET_Y: f32 = 6.0;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            sprites: SpriteCache::new(asset_root),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        overlay_data: Option<&OverlayData>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let frame = self.pixels.frame_mut();
        draw_world(frame, self.viewport, world, &mut self.sprites);
        if let Some(data) = overlay_data {
            draw_overlay(frame, self.viewport.width, self.viewport.height, data);
        }
        self.pixels.render()
    }
}

/// Paints background, entities in draw-list order, then the HUD and banner in screen space.
pub(crate) fn draw_world(
    frame: &mut [u8],
    viewport: Viewport,
    world: &SceneWorld,
    sprites: &mut SpriteCache,
) {
    let (width, height) = (viewport.width, viewport.height);
    let projection = SceneProjection::fit(world.scene_size(), viewport);

    fill_frame(frame, LETTERBOX_COLOR);
    let (scene_left, scene_top) = projection.to_screen_px(Vec2::default());
    let (scene_right, scene_bottom) = projection.to_screen_px(world.scene_size());
    fill_rect(
        frame,
        width,
        height,
        scene_left,
        scene_top,
        scene_right - scene_left,
        scene_bottom - scene_top,
        world.background(),
    );

    for entity in world.entities().iter().filter(|entity| entity.visible) {
        draw_entity(frame, viewport, &projection, entity, sprites);
    }

    draw_hud(frame, width, height, world.hud());
    if let Some(banner) = world.hud().banner.as_ref() {
        draw_banner(frame, width, height, banner);
    }
}

fn draw_entity(
    frame: &mut [u8],
    viewport: Viewport,
    projection: &SceneProjection,
    entity: &Entity,
    sprites: &mut SpriteCache,
) {
    match &entity.renderable.kind {
        RenderableKind::Shapes(layers) => {
            for layer in layers {
                draw_shape_layer(frame, viewport, projection, entity.position, layer);
            }
        }
        RenderableKind::Sprite { location, size } => match sprites.resolve(location) {
            Some(sprite) => {
                let (center_x, center_y) = projection.to_screen_px(entity.position);
                let dest_width = projection.length(size.x).round().max(1.0) as u32;
                let dest_height = projection.length(size.y).round().max(1.0) as u32;
                draw_sprite_stretched(
                    frame,
                    viewport.width,
                    viewport.height,
                    center_x,
                    center_y,
                    sprite,
                    dest_width,
                    dest_height,
                );
            }
            None => {
                for layer in placeholder_silhouette() {
                    draw_shape_layer(frame, viewport, projection, entity.position, &layer);
                }
            }
        },
    }
}

/// Two stacked discs standing in for a sprite whose image is unavailable.
pub(crate) fn placeholder_silhouette() -> [ShapeLayer; 2] {
    [
        ShapeLayer::centered(
            ShapeKind::Circle {
                radius: PLACEHOLDER_BODY_RADIUS,
            },
            PLACEHOLDER_BODY_COLOR,
        )
        .with_offset(Vec2::new(0.0, PLACEHOLDER_BODY_OFFSET_Y)),
        ShapeLayer::centered(
            ShapeKind::Circle {
                radius: PLACEHOLDER_HEAD_RADIUS,
            },
            PLACEHOLDER_HEAD_COLOR,
        )
        .with_offset(Vec2::new(0.0, PLACEHOLDER_HEAD_OFFSET_Y)),
    ]
}

fn draw_shape_layer(
    frame: &mut [u8],
    viewport: Viewport,
    projection: &SceneProjection,
    origin: Vec2,
    layer: &ShapeLayer,
) {
    let center = Vec2::new(origin.x + layer.offset.x, origin.y + layer.offset.y);
    let (screen_x, screen_y) = projection.to_screen(center);
    match layer.shape {
        ShapeKind::Circle { radius } => fill_circle(
            frame,
            viewport.width,
            viewport.height,
            screen_x,
            screen_y,
            projection.length(radius),
            layer.color,
        ),
        ShapeKind::Ellipse { radius_x, radius_y } => fill_ellipse(
            frame,
            viewport.width,
            viewport.height,
            screen_x,
            screen_y,
            projection.length(radius_x),
            projection.length(radius_y),
            layer.color,
        ),
        ShapeKind::Rect {
            width: rect_width,
            height: rect_height,
        } => {
            let rect_width = projection.length(rect_width);
            let rect_height = projection.length(rect_height);
            fill_rect(
                frame,
                viewport.width,
                viewport.height,
                (screen_x - rect_width * 0.5).round() as i32,
                (screen_y - rect_height * 0.5).round() as i32,
                rect_width.round() as i32,
                rect_height.round() as i32,
                layer.color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Banner, RenderableDesc};
    use tempfile::TempDir;

    const VIEWPORT: Viewport = Viewport {
        width: 100,
        height: 100,
    };

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * VIEWPORT.width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn world_with_scene() -> SceneWorld {
        let mut world = SceneWorld::default();
        world.set_scene_size(Vec2::new(100.0, 100.0));
        world.set_background([0, 40, 0, 255]);
        world
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _ = std::mem::size_of::<Renderer>();
    }

    #[test]
    fn missing_sprite_draws_placeholder_silhouette() {
        let temp = TempDir::new().expect("temp");
        let mut sprites = SpriteCache::new(temp.path().to_path_buf());
        let mut world = world_with_scene();
        world.spawn(
            Vec2::new(50.0, 50.0),
            RenderableDesc {
                kind: RenderableKind::Sprite {
                    location: "sprites/player.png".to_string(),
                    size: Vec2::new(34.0, 44.0),
                },
                debug_name: "player",
            },
        );
        world.apply_pending();

        let mut frame = vec![0u8; 100 * 100 * 4];
        draw_world(&mut frame, VIEWPORT, &world, &mut sprites);
        assert_eq!(pixel(&frame, 50, 40), PLACEHOLDER_BODY_COLOR);
        assert_eq!(pixel(&frame, 50, 58), PLACEHOLDER_HEAD_COLOR);
        assert_eq!(pixel(&frame, 5, 95), [0, 40, 0, 255]);

        // The fallback decision is cached; a second frame draws identically.
        let mut second = vec![0u8; 100 * 100 * 4];
        draw_world(&mut second, VIEWPORT, &world, &mut sprites);
        assert_eq!(frame, second);
    }

    #[test]
    fn circle_layers_scale_with_the_projection() {
        let mut sprites = SpriteCache::new(std::env::temp_dir());
        let mut world = SceneWorld::default();
        world.set_scene_size(Vec2::new(200.0, 200.0));
        world.set_background([0, 40, 0, 255]);
        world.spawn(
            Vec2::new(100.0, 100.0),
            RenderableDesc {
                kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
                    ShapeKind::Circle { radius: 20.0 },
                    [200, 10, 10, 255],
                )]),
                debug_name: "gem",
            },
        );
        world.apply_pending();

        let mut frame = vec![0u8; 100 * 100 * 4];
        draw_world(&mut frame, VIEWPORT, &world, &mut sprites);
        assert_eq!(pixel(&frame, 50, 50), [200, 10, 10, 255]);
        assert_eq!(pixel(&frame, 57, 50), [200, 10, 10, 255]);
        assert_eq!(pixel(&frame, 62, 50), [0, 40, 0, 255]);
        assert_eq!(pixel(&frame, 50, 38), [0, 40, 0, 255]);
    }

    #[test]
    fn hidden_entities_are_skipped() {
        let temp = TempDir::new().expect("temp");
        let mut sprites = SpriteCache::new(temp.path().to_path_buf());
        let mut world = world_with_scene();
        let id = world.spawn(
            Vec2::new(50.0, 50.0),
            RenderableDesc {
                kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
                    ShapeKind::Rect {
                        width: 20.0,
                        height: 20.0,
                    },
                    [255, 0, 0, 255],
                )]),
                debug_name: "box",
            },
        );
        world.apply_pending();

        let mut frame = vec![0u8; 100 * 100 * 4];
        draw_world(&mut frame, VIEWPORT, &world, &mut sprites);
        assert_eq!(pixel(&frame, 50, 50), [255, 0, 0, 255]);

        world.find_entity_mut(id).expect("entity").visible = false;
        draw_world(&mut frame, VIEWPORT, &world, &mut sprites);
        assert_eq!(pixel(&frame, 50, 50), [0, 40, 0, 255]);
    }

    #[test]
    fn banner_is_drawn_over_entities() {
        let temp = TempDir::new().expect("temp");
        let mut sprites = SpriteCache::new(temp.path().to_path_buf());
        let mut world = world_with_scene();
        let mut plain = vec![0u8; 100 * 100 * 4];
        draw_world(&mut plain, VIEWPORT, &world, &mut sprites);

        world.hud_mut().banner = Some(Banner {
            title: "WIN".to_string(),
            subtitle: String::new(),
        });
        let mut with_banner = vec![0u8; 100 * 100 * 4];
        draw_world(&mut with_banner, VIEWPORT, &world, &mut sprites);
        assert_ne!(plain, with_banner);
    }

    #[test]
    fn letterbox_bars_surround_a_narrow_scene() {
        let temp = TempDir::new().expect("temp");
        let mut sprites = SpriteCache::new(temp.path().to_path_buf());
        let mut world = SceneWorld::default();
        world.set_scene_size(Vec2::new(50.0, 100.0));
        world.set_background([0, 40, 0, 255]);

        let mut frame = vec![0u8; 100 * 100 * 4];
        draw_world(&mut frame, VIEWPORT, &world, &mut sprites);
        assert_eq!(pixel(&frame, 5, 90), LETTERBOX_COLOR);
        assert_eq!(pixel(&frame, 50, 90), [0, 40, 0, 255]);
    }
}
