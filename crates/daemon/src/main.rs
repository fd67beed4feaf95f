// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! forged: runs the producer and worker loops until SIGINT or SIGTERM.

use std::process::ExitCode;

use forge_daemon::{logging, shutdown_signal, startup, Config, LifecycleError};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("forged: failed to read .env: {e}");
        }
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("forged: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("forged: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "daemon failed");
            eprintln!("forged: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    let daemon = startup(&config).await?;
    shutdown_signal().await;
    daemon.shutdown().await;
    Ok(())
}
