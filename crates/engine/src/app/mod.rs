mod input;
mod loop_runner;
mod metrics;
mod rendering;

pub use input::InputAction;
pub use loop_runner::{
    run_app, run_app_with_metrics, AppError, LoopConfig, SessionSetup, SLOW_FRAME_ENV_VAR,
};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::Renderer;
