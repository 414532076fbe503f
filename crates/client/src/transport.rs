//! The request pipeline wrapping every outbound call.
//!
//! Each exchange goes through the same three steps: conditionally compress
//! the body (setting `Content-Encoding` and letting reqwest recompute
//! `Content-Length`), perform the exchange, classify the outcome. Failure
//! statuses become [`LexiqError::Api`] with structured detail when the
//! response body carries one; failures to obtain any HTTP response become
//! [`LexiqError::Communication`] with the cause chain preserved.
//!
//! The pipeline holds no mutable state beyond reqwest's own connection pool;
//! the compression configuration is captured at construction and immutable.
//! There are no automatic retries here: every failure propagates to the
//! caller on the first occurrence.

use std::time::Duration;

use lexiq_common::compression::{CompressionCodec, CompressionOptions};
use lexiq_domain::{ApiErrorDetails, LexiqError};
use reqwest::header::CONTENT_ENCODING;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::conversions;

/// HTTP transport with conditional request compression.
#[derive(Clone)]
pub struct Transport {
    client: ReqwestClient,
    codec: CompressionCodec,
}

impl Transport {
    /// Build a transport with the given request timeout and compression
    /// configuration.
    pub fn new(timeout: Duration, compression: CompressionOptions) -> Result<Self, LexiqError> {
        let decompress = compression.decompress_responses;

        let mut builder = ReqwestClient::builder()
            .timeout(timeout)
            .gzip(decompress)
            .deflate(decompress);
        #[cfg(feature = "brotli")]
        {
            builder = builder.brotli(decompress);
        }

        let client = builder
            .build()
            .map_err(|err| LexiqError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self { client, codec: CompressionCodec::new(compression) })
    }

    /// Create a request builder on the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute a request, compressing `body` when the configuration says so.
    ///
    /// A configured-but-unavailable compression algorithm fails here, before
    /// any bytes are sent. Success statuses hand the response back untouched;
    /// everything else is classified into the error taxonomy.
    pub async fn execute(
        &self,
        builder: RequestBuilder,
        body: Option<Vec<u8>>,
    ) -> Result<Response, LexiqError> {
        let builder = match body {
            None => builder,
            Some(bytes) => {
                let (payload, encoding) =
                    self.codec.apply(&bytes).map_err(conversions::compression_error)?;
                let payload = payload.into_owned();
                debug!(
                    original_len = bytes.len(),
                    sent_len = payload.len(),
                    encoding = encoding.unwrap_or("identity"),
                    "prepared request body"
                );
                let builder = builder.body(payload);
                match encoding {
                    Some(label) => builder.header(CONTENT_ENCODING, label),
                    None => builder,
                }
            }
        };

        let response = builder.send().await.map_err(communication_error)?;

        let status = response.status();
        debug!(%status, "received HTTP response");
        if status.is_success() {
            return Ok(response);
        }

        Err(LexiqError::Api(error_details(response).await))
    }
}

/// Read a failure response into structured error details.
///
/// A non-empty body is parsed as the service's structured error shape; an
/// empty one is synthesized from the status line. Bodies that are present
/// but not parseable keep their raw text in the message so diagnostics are
/// never dropped.
async fn error_details(response: Response) -> ApiErrorDetails {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let body = response.bytes().await.unwrap_or_default();

    if body.is_empty() {
        return ApiErrorDetails::from_status(status.as_u16(), reason);
    }

    match serde_json::from_slice::<ApiErrorDetails>(&body) {
        Ok(details) if !details.message.is_empty() => details,
        _ => {
            let mut details = ApiErrorDetails::from_status(status.as_u16(), reason);
            details.message = format!("{}: {}", reason, String::from_utf8_lossy(&body));
            details
        }
    }
}

/// Wrap a transport-level failure, keeping the cause chain in the message.
fn communication_error(err: reqwest::Error) -> LexiqError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    LexiqError::Communication(message)
}
