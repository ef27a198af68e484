use std::process::ExitCode;

use configs::{AppConfig, LogFormat};
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(event = "config_invalid", error = %e, "refusing to start");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.server.log_format == LogFormat::Json);

    let instance = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |panic| {
        error!(event = "panic", %instance, message = %panic, "unhandled panic");
    }));

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        runtime.worker_threads(threads);
    }
    let rt = match runtime.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %instance,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "adoption api starting"
    );

    rt.block_on(async move {
        tokio::select! {
            res = server::run(cfg) => match res {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(event = "run_failed", error = %e, "server stopped with an error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(event = "shutdown_signal", %instance, "ctrl-c received, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
