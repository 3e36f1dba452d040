use super::HttpClientError;
use crate::prelude::*;
use crate::{err, err_ctx, Result};
use async_trait::async_trait;
use easy_ext::ext;
use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;

/// Maximum number of characters of a bad response body that are logged
const MAX_LOGGED_BODY_LEN: usize = 1024;

#[ext(RequestBuilderJsonExt)]
#[async_trait]
pub(crate) impl RequestBuilder {
    /// Sends the request and deserializes the response JSON body.
    /// Error status codes are turned into [`HttpClientError::BadResponseStatusCode`].
    async fn read_json<Res: DeserializeOwned>(self) -> Result<Res> {
        let response = self
            .send()
            .await
            .map_err(err_ctx!(HttpClientError::Request))?;

        let status = response.status();

        let bytes = response
            .bytes()
            .await
            .map_err(reqwest_middleware::Error::Reqwest)
            .map_err(err_ctx!(HttpClientError::ReadPayload))?;

        if status.is_client_error() || status.is_server_error() {
            let body = truncated_body(&bytes);
            return Err(err!(HttpClientError::BadResponseStatusCode { status, body }));
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(response_body = %truncated_body(&bytes), "Bad JSON response");
            err!(HttpClientError::UnexpectedResponseJsonShape { source: err })
        })
    }
}

fn truncated_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .take(MAX_LOGGED_BODY_LEN)
        .collect()
}
