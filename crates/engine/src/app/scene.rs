use serde::{Deserialize, Serialize};
use tracing::info;

use super::input::{DirectionSignals, InputAction};

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardReset,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    restart_pressed: bool,
    directions: DirectionSignals,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(restart_pressed: bool, directions: DirectionSignals) -> Self {
        Self {
            restart_pressed,
            directions,
        }
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    pub fn directions(&self) -> DirectionSignals {
        self.directions
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.directions = self.directions.with(action, is_down);
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Circle { radius: f32 },
    Ellipse { radius_x: f32, radius_y: f32 },
    Rect { width: f32, height: f32 },
}

/// One filled primitive of a composite renderable. `offset` is relative to the entity position
/// and, like the shape extents, measured in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeLayer {
    pub shape: ShapeKind,
    pub offset: Vec2,
    pub color: Color,
}

impl ShapeLayer {
    pub fn centered(shape: ShapeKind, color: Color) -> Self {
        Self {
            shape,
            offset: Vec2::default(),
            color,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderableKind {
    Shapes(Vec<ShapeLayer>),
    /// Image drawn centered and stretched to `size`. Falls back to the placeholder silhouette
    /// while the image is unavailable.
    Sprite { location: String, size: Vec2 },
}

#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub debug_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub renderable: RenderableDesc,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudState {
    pub lines: Vec<String>,
    pub banner: Option<Banner>,
}

/// Draw list and HUD for one scene. Entities draw in spawn order.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    scene_size: Vec2,
    background: Color,
    hud: HudState,
}

impl SceneWorld {
    pub fn spawn(&mut self, position: Vec2, renderable: RenderableDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            position,
            renderable,
            visible: true,
        });
        id
    }

    pub fn apply_pending(&mut self) {
        self.entities.append(&mut self.pending_spawns);
    }

    /// Drops every entity and the HUD. Scene size and background survive.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.hud = HudState::default();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn scene_size(&self) -> Vec2 {
        self.scene_size
    }

    pub fn set_scene_size(&mut self, scene_size: Vec2) {
        self.scene_size = scene_size;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut HudState {
        &mut self.hud
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    /// Runs once per presented frame, after the frame's ticks and before drawing.
    fn render(&mut self, world: &mut SceneWorld);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.world.apply_pending();
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let command = self.scene.update(fixed_dt_seconds, input, &mut self.world);
        self.world.apply_pending();
        command
    }

    pub(crate) fn apply_command(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::None => {}
            SceneCommand::HardReset => {
                self.hard_reset();
                info!(entity_count = self.world.entity_count(), "scene_hard_reset");
            }
        }
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&mut self.world);
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
            self.world.clear();
            self.is_loaded = false;
        }
    }

    fn hard_reset(&mut self) {
        self.shutdown();
        self.load();
    }
}
