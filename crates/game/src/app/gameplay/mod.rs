use std::time::Duration;

use engine::{
    Banner, Color, DirectionSignals, EntityId, InputSnapshot, RenderableDesc, RenderableKind,
    Scene, SceneCommand, SceneWorld, ShapeKind, ShapeLayer, Vec2,
};
use tracing::{debug, info};

use super::layout::LayoutConfig;

const STATUS_PROMPT_TEXT: &str = "Find the key, then reach the chest!";
const STATUS_KEY_ACQUIRED_TEXT: &str = "You picked up the key! Now go to the chest.";
const STATUS_ESCAPED_TEXT: &str = "Chest unlocked! You escaped with the treasure!";
const WIN_BANNER_TITLE: &str = "You escaped!";
const WIN_BANNER_SUBTITLE: &str = "Press R or Enter to play again";

const BACKGROUND_COLOR: Color = [22, 48, 66, 255];
const ISLAND_COLOR: Color = [196, 170, 112, 255];
const OBSTACLE_COLOR: Color = [123, 123, 123, 242];
const GEM_COLOR: Color = [144, 200, 255, 255];
const GEM_HIGHLIGHT_COLOR: Color = [255, 255, 255, 153];
const KEY_COLOR: Color = [241, 214, 168, 255];
const CHEST_BODY_COLOR: Color = [63, 46, 26, 255];
const CHEST_BAND_COLOR: Color = [191, 160, 119, 255];
const CHEST_TREASURE_COLOR: Color = [242, 214, 163, 255];
const STAR_COLOR: [u8; 3] = [255, 248, 214];
const STAR_RADIUS: f32 = 2.5;
const STAR_TWINKLE_PERIOD_TICKS: u64 = 96;
const STAR_PHASE_STRIDE_TICKS: u64 = 37;
const STAR_MIN_BRIGHTNESS: f32 = 0.25;

include!("types.rs");
include!("triggers.rs");
include!("deferred.rs");
include!("session.rs");
include!("present.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(layout: &LayoutConfig) -> Box<dyn Scene> {
    Box::new(TreasureScene::new(SessionConfig::from_layout(layout)))
}
