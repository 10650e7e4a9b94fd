use std::process::ExitCode;

use sidescroll_engine::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(app.config, app.setup) {
        error!(error = %err, "run_failed");
        return ExitCode::FAILURE;
    }

    info!("exit_clean");
    ExitCode::SUCCESS
}
