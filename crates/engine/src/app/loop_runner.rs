use std::env;
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

use crate::assets::{AssetError, AssetProvider};
use crate::AppPaths;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::rendering::{OverlayData, Renderer};
use super::{InputAction, InputSnapshot, Scene};

pub const TARGET_TPS_ENV_VAR: &str = "CULTIVATE_TARGET_TPS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub view_width: u32,
    pub view_height: u32,
    pub target_tps: u32,
    pub metrics_log_interval: Duration,
    pub show_fps_overlay: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Cultivate".to_string(),
            view_width: 800,
            view_height: 600,
            target_tps: 60,
            metrics_log_interval: Duration::from_secs(1),
            show_fps_overlay: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load scene assets: {0}")]
    Assets(#[from] AssetError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Loads the scene, opens the window and runs one update, recompute and draw
/// per redraw until the window closes or Escape is pressed.
pub fn run_app(
    config: LoopConfig,
    app_paths: &AppPaths,
    mut scene: Box<dyn Scene>,
) -> Result<(), AppError> {
    info!(
        root = %app_paths.root.display(),
        asset_root = %app_paths.asset_root.display(),
        "startup"
    );

    let mut assets = AssetProvider::new(&app_paths.asset_root);
    scene.load(&mut assets)?;
    info!(cached_visuals = assets.cached_len(), "scene_loaded");

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.view_width as f64,
                config.view_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window), config.view_width, config.view_height)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = resolve_target_tps(config.target_tps);
    let frame_target = target_frame_duration(Some(target_tps));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    info!(
        target_tps,
        view_width = config.view_width,
        view_height = config.view_height,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        show_fps_overlay = config.show_fps_overlay,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize_surface(new_size.width, new_size.height)
                    {
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
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let input_snapshot = input_collector.snapshot_for_tick();
                    debug!(pressed = input_snapshot.pressed().len(), "tick_input");
                    scene.update(&input_snapshot);
                    debug!("tick_update");
                    scene.recompute_state();
                    metrics_accumulator.record_tick();

                    let overlay = config.show_fps_overlay.then(|| OverlayData {
                        metrics: metrics_accumulator.latest(),
                        scene_lines: scene.debug_lines(),
                    });
                    debug!("tick_draw");
                    if let Err(error) = renderer.render_frame(scene.as_ref(), overlay.as_ref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    metrics_accumulator.record_frame(raw_frame_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            "loop_metrics"
                        );
                    }

                    // Single pacing point; one tick per presented frame.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep = compute_cap_sleep(elapsed_since_last_present, frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }
                    last_present_instant = Instant::now();
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    pressed_batch: Vec<InputAction>,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        if is_pressed
            && !self.action_states.is_down(action)
            && !self.pressed_batch.contains(&action)
        {
            self.pressed_batch.push(action);
        }
        self.action_states.set(action, is_pressed);
        if action == InputAction::Quit && is_pressed {
            self.quit_requested = true;
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            std::mem::take(&mut self.pressed_batch),
        )
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => InputAction::MoveUp,
        KeyCode::KeyS | KeyCode::ArrowDown => InputAction::MoveDown,
        KeyCode::KeyA | KeyCode::ArrowLeft => InputAction::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => InputAction::MoveRight,
        KeyCode::KeyX => InputAction::Interact,
        KeyCode::KeyQ => InputAction::QuitInteraction,
        KeyCode::KeyZ => InputAction::Drop,
        KeyCode::KeyC => InputAction::Combine,
        KeyCode::Escape => InputAction::Quit,
        _ => return None,
    };
    Some(action)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn target_frame_duration(target_tps: Option<u32>) -> Option<Duration> {
    target_tps
        .filter(|tps| *tps > 0)
        .map(|tps| Duration::from_secs_f64(1.0 / tps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn resolve_target_tps(config_tps: u32) -> u32 {
    target_tps_from_env_value(env::var(TARGET_TPS_ENV_VAR), config_tps)
}

fn target_tps_from_env_value(value: Result<String, env::VarError>, config_tps: u32) -> u32 {
    let fallback = config_tps.max(1);
    match value {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(tps) if tps > 0 => tps,
            _ => {
                warn!(
                    env_var = TARGET_TPS_ENV_VAR,
                    value = value.as_str(),
                    "invalid target tps env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = TARGET_TPS_ENV_VAR,
                error = %err,
                "unable to read target tps env var; falling back to config"
            );
            fallback
        }
    }
}
