mod ext;
mod macros;

use crate::prelude::*;
use crate::util::DynError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing_error::SpanTrace;

pub(crate) use macros::*;

pub(crate) mod prelude {
    pub(crate) use super::ext::{OptionExt as _, ResultExt as _};
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Describes any possible error that may happen in the application lifetime.
#[derive(Clone)]
pub struct Error {
    imp: Arc<ErrorImp>,
}

struct ErrorImp {
    /// Small identifier used for debugging purposes.
    /// It is logged together with the error, so that the log records
    /// related to a single failure can be looked up by it.
    id: String,
    kind: ErrorKind,

    // Participates only in debug impl
    spantrace: SpanTrace,
}

#[derive(Error, Debug)]
pub(crate) enum ErrorKind {
    #[error(transparent)]
    HttpClient {
        #[from]
        source: crate::http::HttpClientError,
    },

    #[error(transparent)]
    Tg {
        #[from]
        source: teloxide::RequestError,
    },

    #[error(transparent)]
    Config {
        #[from]
        source: crate::config::ConfigError,
    },

    /// Unrecoverable kind of error, that is not supposed to happen, but when
    /// it happens we can't do anything reasonable about it, so no structural
    /// error handling is possible, this error is just propagated to the top.
    #[error("FATAL: {message}")]
    Fatal {
        message: String,
        source: Option<Box<DynError>>,
    },
}

impl Error {
    pub(crate) fn id(&self) -> &str {
        &self.imp.id
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.imp.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.imp.id;
        match &self.imp.kind {
            // Config errors are shown in the terminal before logging is set up,
            // so the whole chain of causes must be visible right away
            ErrorKind::Config { source } => {
                write!(f, "Error (id: {id}): {}", source.display_chain())
            }
            kind => write!(f, "Error (id: {id}): {kind}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.imp.kind)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)?;
        fmt::Display::fmt(&self.imp.spantrace, f)
    }
}

impl<T: Into<ErrorKind>> From<T> for Error {
    #[track_caller]
    fn from(kind: T) -> Self {
        let imp = ErrorImp {
            kind: kind.into(),
            id: nanoid::nanoid!(6),
            spantrace: SpanTrace::capture(),
        };

        let err = Self { imp: Arc::new(imp) };

        trace!(err = tracing_err(&err), "Created an error");

        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::invalid_value;
    use crate::prelude::*;
    use assert_matches::assert_matches;

    #[test]
    fn error_ids_are_unique_and_short() {
        let first = fatal!("boom {}", 1);
        let second = fatal!("boom {}", 2);

        assert_eq!(first.id().len(), 6);
        assert_ne!(first.id(), second.id());
        assert_matches!(first.kind(), ErrorKind::Fatal { source: None, .. });
    }

    #[test]
    fn display_contains_id_and_message() {
        let err = invalid_value("TG_TOKEN", "must not be empty");
        let text = err.to_string();

        assert!(text.starts_with(&format!("Error (id: {}): ", err.id())), "{text}");
        assert!(
            text.ends_with("Invalid value of the TG_TOKEN environment variable: must not be empty"),
            "{text}"
        );
    }

    #[test]
    fn fatal_ctx_keeps_the_source() {
        let result: Result<(), std::io::Error> = Err(std::io::ErrorKind::NotFound.into());
        let err = result.fatal_ctx(|| "Lookup failed").unwrap_err();

        assert_matches!(err.kind(), ErrorKind::Fatal { source: Some(_), message } if message == "Lookup failed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
