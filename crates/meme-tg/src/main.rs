use futures::prelude::*;
use meme_tg::tracing_err;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    if dotenvy::dotenv().is_err() {
        eprintln!("Dotenv config was not found, ignoring this...")
    }

    let config = match meme_tg::Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ Error: {err}");
            eprintln!("1. Create a bot with @BotFather on Telegram");
            eprintln!("2. Put its token into the TG_TOKEN environment variable (or a .env file)");
            return ExitCode::FAILURE;
        }
    };

    let logging_task = meme_tg::init_logging(config.logging.clone());

    if let Err(err) = meme_tg::init_metrics(&config.metrics) {
        error!(err = tracing_err(&err), "Failed to initialize metrics");
        logging_task.shutdown().await;
        return ExitCode::FAILURE;
    }

    let main_fut = AssertUnwindSafe(async {
        let result = meme_tg::run(config).await;

        result.map(|()| ExitCode::SUCCESS).unwrap_or_else(|err| {
            error!(err = tracing_err(&err), "Exitting with an error...");
            ExitCode::FAILURE
        })
    })
    .catch_unwind()
    .unwrap_or_else(|_| {
        error!("Exitting due to a panic...");
        ExitCode::FAILURE
    });

    let exit_code = if !cfg!(debug_assertions) {
        main_fut.await
    } else {
        // Don't wait for teloxide's shutdown logic when cancelling in debug mode.
        // That takes a lot of time for some reason:
        // https://github.com/teloxide/teloxide/issues/711
        tokio::select! {
            exit_code = main_fut => {
                info!("Main task has finished, exiting...");
                exit_code
            }
            () = abort_signal() => ExitCode::SUCCESS,
        }
    };

    logging_task.shutdown().await;

    exit_code
}

async fn abort_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            err = tracing_err(&err),
            "Failed to wait for Ctrl+C, exiting..."
        );
    } else {
        info!("Ctrl+C received, exiting forcefully...");
    }
}
