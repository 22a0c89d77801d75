mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use geometry::{Rect, Vec2};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, TARGET_TPS_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::Canvas;
pub use scene::{InputSnapshot, Scene};
