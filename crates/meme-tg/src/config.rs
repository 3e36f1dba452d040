use crate::observability::logging::LoggingConfig;
use crate::observability::metrics::MetricsConfig;
use crate::posting::reddit;
use crate::{err, err_ctx, tg, Result};
use serde::de::DeserializeOwned;

pub struct Config {
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub(crate) tg: tg::Config,
    pub(crate) reddit: reddit::Config,
}

impl Config {
    /// Loads the config from the environment variables. Fails if the bot
    /// token is missing or still has the placeholder value.
    pub fn load() -> Result<Config> {
        let config = Self {
            logging: from_env("")?,
            metrics: from_env("")?,
            tg: from_env("TG_")?,
            reddit: from_env("REDDIT_")?,
        };

        config.tg.validate()?;
        config.reddit.validate()?;

        Ok(config)
    }
}

pub(crate) fn from_env<T: DeserializeOwned>(prefix: &'static str) -> Result<T> {
    envy::prefixed(prefix)
        .from_env()
        .map_err(err_ctx!(ConfigError::Env { prefix }))
}

#[cfg(test)]
pub(crate) fn from_iter<T: DeserializeOwned>(
    prefix: &'static str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<T> {
    envy::prefixed(prefix)
        .from_iter(vars)
        .map_err(err_ctx!(ConfigError::Env { prefix }))
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Couldn't load config from environment variables with prefix '{prefix}'")]
    Env {
        prefix: &'static str,
        source: envy::Error,
    },

    #[error("Invalid value of the {var} environment variable: {reason}")]
    InvalidValue {
        var: &'static str,
        reason: &'static str,
    },
}

pub(crate) fn invalid_value(var: &'static str, reason: &'static str) -> crate::Error {
    err!(ConfigError::InvalidValue { var, reason })
}
