use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::{resolve_app_paths, StartupError};

use super::metrics::MetricsAccumulator;
use super::scene::SceneRuntime;
use super::{InputSnapshot, InputTracker, OverlayData, Renderer, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
    /// Directory sprite locations resolve against. `None` resolves `<root>/assets`.
    pub asset_root: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Treasure Escape".to_string(),
            window_width: 700,
            window_height: 840,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
            asset_root: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let asset_root = match config.asset_root.clone() {
        Some(path) => path,
        None => resolve_app_paths()?.assets_dir,
    };
    info!(asset_root = %asset_root.display(), "startup");

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer =
        Renderer::new(Arc::clone(&window), asset_root).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut clock = FixedStepClock::new(
        config.target_tps,
        config.max_frame_delta,
        config.max_ticks_per_frame,
    );
    let fixed_dt_seconds = clock.fixed_dt().as_secs_f32();
    let metrics_log_interval = non_zero_or(config.metrics_log_interval, Duration::from_secs(1));
    let render_cap = RenderCap::new(config.max_render_fps);

    let mut runtime = SceneRuntime::new(scene);
    runtime.load();
    info!(
        entity_count = runtime.world().entity_count(),
        "scene_loaded"
    );
    info!(
        target_tps = clock.target_tps(),
        max_frame_delta_ms = clock.max_frame_delta().as_millis() as u64,
        max_ticks_per_frame = clock.max_ticks_per_frame(),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %render_cap,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut tick_counter = 0u64;
    let mut last_applied_title: Option<String> = None;
    let mut overlay_visible = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.take_overlay_toggle_pressed() {
                        overlay_visible = !overlay_visible;
                        info!(overlay_visible, "overlay_toggled");
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let step_plan = clock.advance(raw_frame_dt);
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        let command = runtime.update(fixed_dt_seconds, &input_snapshot);
                        runtime.apply_command(command);
                        tick_counter = tick_counter.saturating_add(1);
                        metrics_accumulator.record_tick();
                    }
                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame = clock.max_ticks_per_frame(),
                            "sim_clamp_triggered"
                        );
                    }

                    let cap_sleep = render_cap
                        .sleep_before_present(last_present_instant.elapsed());
                    if !cap_sleep.is_zero() {
                        thread::sleep(cap_sleep);
                    }

                    runtime.render();
                    let overlay = overlay_visible.then(|| OverlayData {
                        metrics: metrics_accumulator.latest(),
                        render_fps_cap: render_cap.fps(),
                        entity_count: runtime.world().entity_count(),
                        tick_counter,
                    });
                    if let Err(error) = renderer.render_world(runtime.world(), overlay.as_ref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = runtime.debug_title();
                    if next_title != last_applied_title {
                        window.set_title(next_title.as_deref().unwrap_or(&config.window_title));
                        last_applied_title = next_title;
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            entity_count = runtime.world().entity_count(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                runtime.shutdown();
                info!(tick_counter, "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Latches keyboard state between ticks. Direction keys are level-triggered through the
/// [`InputTracker`]; restart and overlay toggle fire once per physical press.
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    tracker: InputTracker,
    restart_is_down: bool,
    restart_pressed_edge: bool,
    overlay_toggle_is_down: bool,
    overlay_toggle_pressed_edge: bool,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return;
        };
        self.handle_key(code, key_event.state);
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => self.tracker.on_key_down(code),
            ElementState::Released => self.tracker.on_key_up(code),
        }

        if is_restart_key(code) {
            self.restart_pressed_edge |=
                register_press(&mut self.restart_is_down, state);
        } else if code == KeyCode::F3 {
            self.overlay_toggle_pressed_edge |=
                register_press(&mut self.overlay_toggle_is_down, state);
        } else if code == KeyCode::Escape && state == ElementState::Pressed {
            self.mark_quit_requested();
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.restart_pressed_edge, self.tracker.signals());
        if self.restart_pressed_edge {
            debug!("restart_requested");
        }
        self.restart_pressed_edge = false;
        snapshot
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.overlay_toggle_pressed_edge;
        self.overlay_toggle_pressed_edge = false;
        was_pressed
    }
}

/// Returns true on the released-to-pressed transition only, so OS key repeat is ignored.
fn register_press(is_down: &mut bool, state: ElementState) -> bool {
    match state {
        ElementState::Pressed => {
            let edge = !*is_down;
            *is_down = true;
            edge
        }
        ElementState::Released => {
            *is_down = false;
            false
        }
    }
}

fn is_restart_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::KeyR | KeyCode::Enter | KeyCode::NumpadEnter
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepPlan {
    ticks_to_run: u32,
    dropped_backlog: Duration,
}

/// Fixed-timestep accumulator. Frame deltas are clamped before they are banked, and a frame
/// never runs more than `max_ticks_per_frame` ticks; backlog beyond that is discarded.
#[derive(Debug)]
struct FixedStepClock {
    target_tps: u32,
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    banked: Duration,
}

impl FixedStepClock {
    fn new(target_tps: u32, max_frame_delta: Duration, max_ticks_per_frame: u32) -> Self {
        let target_tps = target_tps.max(1);
        Self {
            target_tps,
            fixed_dt: Duration::from_secs_f64(1.0 / f64::from(target_tps)),
            max_frame_delta: non_zero_or(max_frame_delta, Duration::from_millis(250)),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            banked: Duration::ZERO,
        }
    }

    fn target_tps(&self) -> u32 {
        self.target_tps
    }

    fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    fn max_ticks_per_frame(&self) -> u32 {
        self.max_ticks_per_frame
    }

    fn advance(&mut self, raw_frame_dt: Duration) -> StepPlan {
        self.banked = self
            .banked
            .saturating_add(raw_frame_dt.min(self.max_frame_delta));

        let mut ticks_to_run = 0u32;
        while self.banked >= self.fixed_dt && ticks_to_run < self.max_ticks_per_frame {
            self.banked -= self.fixed_dt;
            ticks_to_run += 1;
        }
        let dropped_backlog = if self.banked >= self.fixed_dt {
            std::mem::take(&mut self.banked)
        } else {
            Duration::ZERO
        };
        StepPlan {
            ticks_to_run,
            dropped_backlog,
        }
    }
}

/// Optional upper bound on presented frames per second. `Some(0)` counts as uncapped.
#[derive(Debug, Clone, Copy)]
struct RenderCap {
    fps: Option<u32>,
}

impl RenderCap {
    fn new(fps: Option<u32>) -> Self {
        Self {
            fps: fps.filter(|value| *value > 0),
        }
    }

    fn fps(&self) -> Option<u32> {
        self.fps
    }

    fn sleep_before_present(&self, since_last_present: Duration) -> Duration {
        self.fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
            .map_or(Duration::ZERO, |frame| frame.saturating_sub(since_last_present))
    }
}

impl fmt::Display for RenderCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fps {
            Some(fps) => write!(f, "{fps}"),
            None => f.write_str("off"),
        }
    }
}

fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputAction;

    fn clock_at_tps(target_tps: u32, max_ticks_per_frame: u32) -> FixedStepClock {
        FixedStepClock::new(target_tps, Duration::from_millis(250), max_ticks_per_frame)
    }

    #[test]
    fn clock_runs_one_tick_per_fixed_step() {
        let mut clock = clock_at_tps(50, 5);
        assert_eq!(clock.fixed_dt(), Duration::from_millis(20));
        let plan = clock.advance(Duration::from_millis(60));
        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn clock_banks_partial_steps_for_the_next_frame() {
        let mut clock = clock_at_tps(50, 5);
        assert_eq!(clock.advance(Duration::from_millis(15)).ticks_to_run, 0);
        assert_eq!(clock.advance(Duration::from_millis(15)).ticks_to_run, 1);
        assert_eq!(clock.advance(Duration::from_millis(10)).ticks_to_run, 1);
    }

    #[test]
    fn clock_clamps_long_frames_before_banking() {
        let mut clock = clock_at_tps(50, 100);
        let plan = clock.advance(Duration::from_secs(3));
        assert_eq!(plan.ticks_to_run, 12);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn clock_discards_backlog_past_tick_limit() {
        let mut clock = clock_at_tps(50, 2);
        let plan = clock.advance(Duration::from_millis(90));
        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(50));
        assert_eq!(clock.advance(Duration::ZERO).ticks_to_run, 0);
    }

    #[test]
    fn clock_sanitizes_zero_settings() {
        let clock = FixedStepClock::new(0, Duration::ZERO, 0);
        assert_eq!(clock.target_tps(), 1);
        assert_eq!(clock.max_ticks_per_frame(), 1);
        assert_eq!(clock.max_frame_delta(), Duration::from_millis(250));
    }

    #[test]
    fn render_cap_sleeps_only_for_the_remaining_frame_budget() {
        let cap = RenderCap::new(Some(20));
        assert_eq!(
            cap.sleep_before_present(Duration::from_millis(30)),
            Duration::from_millis(20)
        );
        assert_eq!(cap.sleep_before_present(Duration::from_millis(80)), Duration::ZERO);
        assert_eq!(cap.to_string(), "20");

        let uncapped = RenderCap::new(Some(0));
        assert_eq!(uncapped.fps(), None);
        assert_eq!(uncapped.sleep_before_present(Duration::ZERO), Duration::ZERO);
        assert_eq!(uncapped.to_string(), "off");
    }

    #[test]
    fn restart_press_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::KeyR, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();
        assert!(first.restart_pressed());
        assert!(!second.restart_pressed());
    }

    #[test]
    fn held_restart_does_not_repeat() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::Enter, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        input.handle_key(KeyCode::Enter, ElementState::Pressed);
        let second = input.snapshot_for_tick();
        input.handle_key(KeyCode::Enter, ElementState::Released);
        input.handle_key(KeyCode::Enter, ElementState::Pressed);
        let third = input.snapshot_for_tick();
        assert!(first.restart_pressed());
        assert!(!second.restart_pressed());
        assert!(third.restart_pressed());
    }

    #[test]
    fn arrow_keys_are_level_triggered_across_ticks() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::ArrowRight, ElementState::Pressed);
        assert!(input.snapshot_for_tick().directions().is_down(InputAction::MoveRight));
        assert!(input.snapshot_for_tick().directions().is_down(InputAction::MoveRight));
        input.handle_key(KeyCode::ArrowRight, ElementState::Released);
        assert!(!input.snapshot_for_tick().directions().is_down(InputAction::MoveRight));
    }

    #[test]
    fn wasd_does_not_move() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(!input.snapshot_for_tick().directions().any());
    }

    #[test]
    fn f3_toggle_is_edge_triggered() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::F3, ElementState::Pressed);
        assert!(input.take_overlay_toggle_pressed());
        input.handle_key(KeyCode::F3, ElementState::Pressed);
        assert!(!input.take_overlay_toggle_pressed());
        input.handle_key(KeyCode::F3, ElementState::Released);
        input.handle_key(KeyCode::F3, ElementState::Pressed);
        assert!(input.take_overlay_toggle_pressed());
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::Escape, ElementState::Pressed);
        assert!(input.quit_requested);
    }
}
