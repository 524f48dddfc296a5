mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{DirectionSignals, InputAction, InputTracker};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub(crate) use rendering::OverlayData;
pub use rendering::{
    Renderer, Viewport, PLACEHOLDER_BODY_COLOR, PLACEHOLDER_HEAD_COLOR,
};
pub use scene::{
    Banner, Color, Entity, EntityId, HudState, InputSnapshot, RenderableDesc, RenderableKind,
    Scene, SceneCommand, SceneWorld, ShapeKind, ShapeLayer, Vec2,
};
