mod json_ext;

use crate::prelude::*;
use crate::Result;
use async_trait::async_trait;
use reqwest_middleware::RequestBuilder;
use std::time::{Duration, Instant};

pub(crate) mod prelude {
    pub(crate) use super::json_ext::RequestBuilderJsonExt;
}

pub(crate) type Client = reqwest_middleware::ClientWithMiddleware;

const USER_AGENT: &str = concat!("MemeTelegramBot/", env!("CARGO_PKG_VERSION"));

/// Creates an HTTP client where every request is bounded by the given timeout.
/// There are no retries at this layer. The callers decide whether another
/// attempt makes sense.
pub(crate) fn create_client(timeout: Duration) -> Result<Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .fatal_ctx(|| "Failed to build the HTTP client")?;

    let client = reqwest_middleware::ClientBuilder::new(client)
        .with(ObservingMiddleware)
        .with_init(|request_builder: RequestBuilder| {
            // Reddit throttles or blocks requests with generic user agents
            request_builder.header(reqwest::header::USER_AGENT, USER_AGENT)
        })
        .build();

    Ok(client)
}

struct ObservingMiddleware;

#[async_trait]
impl reqwest_middleware::Middleware for ObservingMiddleware {
    async fn handle(
        &self,
        request: reqwest::Request,
        extensions: &mut task_local_extensions::Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let span = info_span!(
            "request",
            version = ?request.version(),
            method = %request.method(),
            url = %request.url(),
        );

        async {
            let labels = request_labels(&request);

            let start = Instant::now();
            let result = next.run(request, extensions).await;
            let elapsed = start.elapsed();

            let status = match &result {
                Ok(response) => response.status().as_u16().to_string(),
                Err(_) => "{fatal}".to_owned(),
            };

            metrics::histogram!(
                "http_request_duration_seconds",
                elapsed.as_secs_f64(),
                "method" => labels.method,
                "host" => labels.host,
                "status" => status
            );

            log_response(&result, elapsed);

            result
        }
        .instrument(span)
        .await
    }
}

fn log_response(result: &reqwest_middleware::Result<reqwest::Response>, elapsed: Duration) {
    let duration = tracing_duration(elapsed);

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            error!(duration, err = tracing_err(err), "Network request failed");
            return;
        }
    };

    let status = response.status();

    let Err(err) = response.error_for_status_ref() else {
        info!(duration, %status, "Network request succeeded");
        return;
    };

    warn!(
        err = tracing_err(&err),
        duration,
        %status,
        "Network request failed (error status)"
    );
}

struct RequestLabels {
    method: String,
    host: String,
}

fn request_labels(request: &reqwest::Request) -> RequestLabels {
    RequestLabels {
        method: request.method().to_string(),
        host: request.url().host_str().unwrap_or("{unknown}").to_owned(),
    }
}

/// Errors at the layer of the HTTP API
#[derive(Debug, thiserror::Error)]
pub(crate) enum HttpClientError {
    #[error("HTTP request failed")]
    Request { source: reqwest_middleware::Error },

    #[error("Failed to read HTTP response")]
    ReadPayload { source: reqwest_middleware::Error },

    #[error("HTTP request has failed (HTTP status code: {status}):\n{body}")]
    BadResponseStatusCode {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Received an unexpected response JSON object")]
    UnexpectedResponseJsonShape { source: serde_json::Error },
}
