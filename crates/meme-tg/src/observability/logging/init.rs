use crate::observability::GLOBAL_LABELS;
use crate::prelude::*;
use serde::Deserialize;
use serde_with::serde_as;
use std::collections::HashMap;
use tracing_subscriber::prelude::*;

pub struct LoggingTask {
    loki: Option<LokiTask>,
}

struct LokiTask {
    task: tokio::task::JoinHandle<()>,
    controller: tracing_loki::BackgroundTaskController,
}

impl LoggingTask {
    pub async fn shutdown(self) {
        let Some(loki) = self.loki else {
            return;
        };

        info!("Waiting for the logging task to finish nicely...");

        let ((), duration) = loki.controller.shutdown().with_duration().await;

        eprintln!(
            "Stopped logging task in {:.2?}: {:?}",
            duration,
            loki.task.await
        );
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Logs are shipped to Grafana Loki only if this is set
    #[serde(default)]
    loki_url: Option<url::Url>,

    #[serde_as(as = "Option<serde_with::json::JsonString>")]
    #[serde(default)]
    tg_bot_log_labels: Option<HashMap<String, String>>,
}

pub fn init_logging(config: LoggingConfig) -> LoggingTask {
    let env_filter = tracing_subscriber::EnvFilter::try_from_env("TG_BOT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::env::var("COLORS").as_deref() != Ok("0"))
        .pretty();

    let (loki, loki_task) = match config.loki_layer() {
        Ok(Some((layer, task))) => (Some(layer), Some(task)),
        Ok(None) => (None, None),
        Err(err) => {
            eprintln!("Failed to set up the loki logging layer, logs won't be shipped: {err}");
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(fmt)
        .with(loki)
        .with(env_filter)
        .with(tracing_error::ErrorLayer::default())
        .init();

    init_panic_hook();

    LoggingTask { loki: loki_task }
}

impl LoggingConfig {
    fn loki_layer(self) -> Result<Option<(tracing_loki::Layer, LokiTask)>, tracing_loki::Error> {
        let Some(loki_url) = self.loki_url else {
            return Ok(None);
        };

        let additional_labels = GLOBAL_LABELS.iter().chain(&[("source", "meme-tg")]);

        let mut labels = self.tg_bot_log_labels.unwrap_or_default();
        labels.extend(additional_labels.map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));

        let (layer, controller, task) = labels
            .into_iter()
            .try_fold(tracing_loki::builder(), |builder, (key, value)| {
                builder.label(key, value)
            })?
            .build_controller_url(loki_url)?;

        let task = tokio::spawn(task);

        Ok(Some((layer, LokiTask { task, controller })))
    }
}

fn init_panic_hook() {
    let current_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        // It's super-important to call the default panic hook, otherwise
        // we may not see it in the logs at all, because the panic may
        // happen inside of `tracing` logging system itself.
        // See the footgun: https://github.com/rust-itertools/itertools/issues/667
        current_hook(panic_info);

        let backtrace = std::backtrace::Backtrace::capture();
        let location = panic_info.location().map(|location| {
            format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            )
        });

        let message = crate::util::panic_message(panic_info.payload());

        let span_trace = tracing_error::SpanTrace::capture();

        error!(
            target: "panic",
            thread = std::thread::current().name(),
            location,
            span_trace = %span_trace,
            backtrace = format_args!("\n{backtrace}"),
            "{message}"
        );
    }));
}
