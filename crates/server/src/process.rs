//! Process entry shared by the four service binaries.

use std::process::ExitCode;

use common::types::ServiceKind;
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(kind: ServiceKind) {
    // .env first so RUST_LOG and LOG_FORMAT from it take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = %kind, event = "logger_init", "tracing subscriber initialized");
}

/// Load config, build the runtime and run `kind` to completion.
pub fn launch(kind: ServiceKind) -> ExitCode {
    init_logging(kind);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = %kind,
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match AppConfig::load_and_validate(kind) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = %kind, event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = %kind, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = %kind,
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(async move {
        match crate::startup::run(kind, cfg).await {
            Ok(()) => {
                info!(service = %kind, event = "stop", %service_id, pid, "service stopped normally");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = %kind, event = "run_failed", error = %e, "service exited with error");
                ExitCode::FAILURE
            }
        }
    })
}
