mod config;
mod error;
mod http;
mod observability;
mod posting;
mod tg;

pub mod util;

pub use crate::error::*;
pub use config::*;
pub use observability::logging::{init_logging, tracing_err, LoggingConfig, LoggingTask};
pub use observability::metrics::{init_metrics, MetricsConfig};

#[allow(unused_imports)]
mod prelude {
    pub(crate) use crate::error::prelude::*;
    pub(crate) use crate::http::prelude::*;
    pub(crate) use crate::observability::logging::prelude::*;
    pub(crate) use crate::util::prelude::*;
}

/// Run the telegram bot processing loop
pub async fn run(config: Config) -> Result<()> {
    let opts = tg::RunBotOptions {
        tg_cfg: config.tg,
        reddit_cfg: config.reddit,
    };

    tg::run_bot(opts).await
}
