use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader};
use thiserror::Error;
use tracing::{debug, warn};

use crate::asset_locations::{resolve_asset_path, AssetLocationError};

use super::raster::blend_pixel_clipped;

#[derive(Debug, Error)]
pub(crate) enum SpriteLoadError {
    #[error("invalid asset location: {0}")]
    Location(#[from] AssetLocationError),
    #[error("file open failed: {0}")]
    Open(#[from] io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// Decoded images keyed by asset location. A failed load is cached as `None` and reported once,
/// so an unavailable image costs one filesystem probe for the lifetime of the cache.
#[derive(Debug)]
pub(crate) struct SpriteCache {
    asset_root: PathBuf,
    sprites: HashMap<String, Option<LoadedSprite>>,
    warned_locations: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            sprites: HashMap::new(),
            warned_locations: HashSet::new(),
        }
    }

    pub(crate) fn resolve(&mut self, location: &str) -> Option<&LoadedSprite> {
        if !self.sprites.contains_key(location) {
            let loaded = match load_sprite(&self.asset_root, location) {
                Ok(sprite) => {
                    debug!(
                        location,
                        width = sprite.width,
                        height = sprite.height,
                        "renderer_sprite_loaded"
                    );
                    Some(sprite)
                }
                Err(error) => {
                    self.warn_once(location, &error);
                    None
                }
            };
            self.sprites.insert(location.to_string(), loaded);
        }
        self.sprites.get(location).and_then(Option::as_ref)
    }

    fn warn_once(&mut self, location: &str, error: &SpriteLoadError) {
        if !self.warned_locations.insert(location.to_string()) {
            return;
        }
        warn!(
            location,
            asset_root = %self.asset_root.display(),
            reason = %error,
            "renderer_sprite_load_failed_using_placeholder"
        );
    }

    #[cfg(test)]
    fn warned_count(&self) -> usize {
        self.warned_locations.len()
    }
}

fn load_sprite(asset_root: &Path, location: &str) -> Result<LoadedSprite, SpriteLoadError> {
    let path = resolve_asset_path(asset_root, location)?;
    let image = ImageReader::open(&path)?.decode()?.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

/// Nearest-neighbour stretch of `sprite` into a `dest_width` x `dest_height` box centered on
/// the given screen point. Transparent source texels are skipped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_sprite_stretched(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    sprite: &LoadedSprite,
    dest_width: u32,
    dest_height: u32,
) {
    if sprite.width == 0 || sprite.height == 0 || dest_width == 0 || dest_height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let left = center_x - (dest_width as i32 / 2);
    let top = center_y - (dest_height as i32 / 2);
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + dest_width as i32).min(width as i32);
    let draw_bottom = (top + dest_height as i32).min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let x_ratio = sprite.width as f32 / dest_width as f32;
    let y_ratio = sprite.height as f32 / dest_height as f32;
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = (((out_y - top) as f32) * y_ratio).floor() as u32;
        let src_y = src_y.min(sprite.height - 1) as usize;
        let src_row_offset = src_y * sprite_width * 4;

        for out_x in draw_left..draw_right {
            let src_x = (((out_x - left) as f32) * x_ratio).floor() as u32;
            let src_x = src_x.min(sprite.width - 1) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let texel = [
                sprite.rgba[src_offset],
                sprite.rgba[src_offset + 1],
                sprite.rgba[src_offset + 2],
                sprite.rgba[src_offset + 3],
            ];
            blend_pixel_clipped(frame, width, out_x, out_y, texel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(root: &Path, location: &str, width: u32, height: u32, color: [u8; 4]) {
        let path = resolve_asset_path(root, location).expect("location");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(&path)
            .expect("save png");
    }

    #[test]
    fn missing_image_is_cached_as_unavailable_and_warned_once() {
        let temp = TempDir::new().expect("temp");
        let mut cache = SpriteCache::new(temp.path().to_path_buf());

        assert!(cache.resolve("sprites/player.png").is_none());
        assert!(cache.resolve("sprites/player.png").is_none());
        assert_eq!(cache.warned_count(), 1);
    }

    #[test]
    fn invalid_location_is_reported_without_touching_disk() {
        let temp = TempDir::new().expect("temp");
        let mut cache = SpriteCache::new(temp.path().to_path_buf());
        assert!(cache.resolve("../outside.png").is_none());
        let error = load_sprite(temp.path(), "../outside.png").expect_err("must fail");
        assert!(matches!(
            error,
            SpriteLoadError::Location(AssetLocationError::ParentTraversal)
        ));
    }

    #[test]
    fn corrupt_file_reports_decode_failure() {
        let temp = TempDir::new().expect("temp");
        std::fs::write(temp.path().join("broken.png"), b"not a png").expect("write");
        let error = load_sprite(temp.path(), "broken.png").expect_err("must fail");
        assert!(matches!(error, SpriteLoadError::Decode(_)));
    }

    #[test]
    fn present_image_decodes_to_rgba() {
        let temp = TempDir::new().expect("temp");
        write_png(temp.path(), "sprites/player.png", 3, 2, [10, 20, 30, 255]);
        let mut cache = SpriteCache::new(temp.path().to_path_buf());

        let sprite = cache.resolve("sprites/player.png").expect("sprite");
        assert_eq!((sprite.width, sprite.height), (3, 2));
        assert_eq!(&sprite.rgba[0..4], &[10, 20, 30, 255]);
        assert_eq!(cache.warned_count(), 0);
    }

    #[test]
    fn stretched_draw_fills_destination_box() {
        let sprite = LoadedSprite {
            width: 1,
            height: 1,
            rgba: vec![9, 8, 7, 255],
        };
        let mut frame = vec![0u8; 10 * 10 * 4];
        draw_sprite_stretched(&mut frame, 10, 10, 5, 5, &sprite, 4, 6);

        let lit = frame
            .chunks_exact(4)
            .filter(|pixel| *pixel == [9, 8, 7, 255])
            .count();
        assert_eq!(lit, 24);
    }

    #[test]
    fn stretched_draw_clips_at_frame_edges() {
        let sprite = LoadedSprite {
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        };
        let mut frame = vec![0u8; 4 * 4 * 4];
        draw_sprite_stretched(&mut frame, 4, 4, 0, 0, &sprite, 4, 4);
        let lit = frame.chunks_exact(4).filter(|pixel| pixel[3] == 255).count();
        assert_eq!(lit, 4);
    }
}
