//! Resource facade over the transport pipeline.
//!
//! `Client` owns the base URL, the optional API key and the compression
//! configuration, and exposes one thin method per resource operation. Every
//! mutating call returns a [`TaskHandle`]; `wait_for_task` /
//! `wait_for_dump` drive the shared status poller over the matching fetch
//! primitive.

use std::time::Duration;

use chrono::{DateTime, Utc};
use lexiq_common::auth::{self, SearchRules};
use lexiq_common::compression::CompressionOptions;
use lexiq_common::polling::{Progress, StatusPoller};
use lexiq_domain::{DumpInfo, LexiqError, Task, TaskHandle};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::conversions;
use crate::transport::Transport;

/// Default timeout for a single HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Service health payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    /// Reported availability (e.g. "available")
    pub status: String,
}

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service (e.g. "http://localhost:7700")
    pub base_url: String,
    /// API key sent as a bearer token, if the service requires one
    pub api_key: Option<String>,
    /// Timeout for each HTTP exchange
    pub timeout: Duration,
    /// Request compression configuration
    pub compression: CompressionOptions,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            compression: CompressionOptions::default(),
        }
    }
}

/// Client for the Lexiq document-search service.
pub struct Client {
    config: ClientConfig,
    transport: Transport,
}

impl Client {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, LexiqError> {
        if config.base_url.is_empty() {
            return Err(LexiqError::Config("base url must not be empty".to_string()));
        }

        let transport = Transport::new(config.timeout, config.compression.clone())?;
        Ok(Self { config, transport })
    }

    /// Create a builder for fluent configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.transport.request(method, self.url(path));
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, LexiqError> {
        debug!(path, "GET request");
        let response = self.transport.execute(self.request(Method::GET, path), None).await?;
        read_json(response).await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<R, LexiqError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%method, path, "request with body");
        let mut builder = self.request(method, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }

        let bytes = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Some(serde_json::to_vec(body)?)
            }
            None => None,
        };

        let response = self.transport.execute(builder, bytes).await?;
        read_json(response).await
    }

    /// Check service availability.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Health, LexiqError> {
        self.get_json("/health").await
    }

    /// Enqueue creation of a new index.
    pub async fn create_index(
        &self,
        uid: &str,
        primary_key: Option<&str>,
    ) -> Result<TaskHandle, LexiqError> {
        #[derive(Serialize)]
        struct CreateIndexBody<'a> {
            uid: &'a str,
            #[serde(rename = "primaryKey", skip_serializing_if = "Option::is_none")]
            primary_key: Option<&'a str>,
        }

        self.send_json(Method::POST, "/indexes", &[], Some(&CreateIndexBody { uid, primary_key }))
            .await
    }

    /// Enqueue deletion of an index.
    pub async fn delete_index(&self, uid: &str) -> Result<TaskHandle, LexiqError> {
        let path = format!("/indexes/{uid}");
        self.send_json::<(), TaskHandle>(Method::DELETE, &path, &[], None).await
    }

    /// Enqueue an add-or-replace upload of documents into an index.
    ///
    /// This is the call request compression is aimed at: document batches are
    /// the only payloads that routinely clear the size threshold.
    pub async fn add_documents<T: Serialize>(
        &self,
        index_uid: &str,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskHandle, LexiqError> {
        let path = format!("/indexes/{index_uid}/documents");
        let query: Vec<(&str, &str)> = match primary_key {
            Some(key) => vec![("primaryKey", key)],
            None => Vec::new(),
        };
        self.send_json(Method::POST, &path, &query, Some(documents)).await
    }

    /// Fetch the current snapshot of a task.
    pub async fn get_task(&self, uid: u64) -> Result<Task, LexiqError> {
        self.get_json(&format!("/tasks/{uid}")).await
    }

    /// Wait for a task to reach a terminal status with the default budget
    /// (5 s timeout, 50 ms interval).
    pub async fn wait_for_task(&self, uid: u64) -> Result<Task, LexiqError> {
        self.wait_for_task_with(uid, StatusPoller::new()).await
    }

    /// Wait for a task to reach a terminal status with a caller-configured
    /// poller (budget, interval, cancellation).
    #[instrument(skip(self, poller))]
    pub async fn wait_for_task_with(
        &self,
        uid: u64,
        poller: StatusPoller,
    ) -> Result<Task, LexiqError> {
        poller
            .wait_until_terminal(
                uid,
                || self.get_task(uid),
                |task: Task| {
                    if task.is_terminal() {
                        Progress::Terminal(task)
                    } else {
                        Progress::Pending
                    }
                },
            )
            .await
            .map_err(conversions::poll_error)
    }

    /// Trigger creation of a dump.
    pub async fn create_dump(&self) -> Result<DumpInfo, LexiqError> {
        self.send_json::<(), DumpInfo>(Method::POST, "/dumps", &[], None).await
    }

    /// Fetch the current status of a dump.
    pub async fn get_dump_status(&self, uid: &str) -> Result<DumpInfo, LexiqError> {
        self.get_json(&format!("/dumps/{uid}/status")).await
    }

    /// Wait for a dump to finish with the default budget.
    pub async fn wait_for_dump(&self, uid: &str) -> Result<DumpInfo, LexiqError> {
        self.wait_for_dump_with(uid, StatusPoller::new()).await
    }

    /// Wait for a dump to finish with a caller-configured poller.
    ///
    /// Same polling machinery as tasks; only the terminal vocabulary
    /// (`done`/`failed`) differs.
    #[instrument(skip(self, poller))]
    pub async fn wait_for_dump_with(
        &self,
        uid: &str,
        poller: StatusPoller,
    ) -> Result<DumpInfo, LexiqError> {
        poller
            .wait_until_terminal(
                uid,
                || self.get_dump_status(uid),
                |dump: DumpInfo| {
                    if dump.is_terminal() {
                        Progress::Terminal(dump)
                    } else {
                        Progress::Pending
                    }
                },
            )
            .await
            .map_err(conversions::poll_error)
    }

    /// Sign a tenant token scoping search access for a downstream caller.
    ///
    /// Uses `api_key` when given, otherwise falls back to the client's own
    /// configured key. Pure computation; no request is made.
    pub fn generate_tenant_token(
        &self,
        api_key_uid: &str,
        search_rules: SearchRules,
        api_key: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<String, LexiqError> {
        let key = api_key.or(self.config.api_key.as_deref()).ok_or_else(|| {
            LexiqError::Config("an api key is required to sign a tenant token".to_string())
        })?;

        auth::generate_tenant_token(api_key_uid, search_rules, key, expires_at)
            .map_err(conversions::tenant_token_error)
    }
}

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    compression: Option<CompressionOptions>,
}

impl ClientBuilder {
    /// Set the base URL of the service.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the request compression configuration.
    pub fn compression(mut self, compression: CompressionOptions) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL was not set or client creation
    /// fails.
    pub fn build(self) -> Result<Client, LexiqError> {
        let base_url =
            self.base_url.ok_or_else(|| LexiqError::Config("base url not set".to_string()))?;

        Client::new(ClientConfig {
            base_url,
            api_key: self.api_key,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            compression: self.compression.unwrap_or_default(),
        })
    }
}

async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, LexiqError> {
    let status = response.status();

    // 204/205 carry no body by spec; only types that deserialize from null
    // (e.g. `()`) are valid here.
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            LexiqError::Serialization(format!(
                "no content response ({}) cannot fill the expected type",
                status.as_u16()
            ))
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| LexiqError::Communication(err.to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| LexiqError::Serialization(format!("failed to parse response: {err}")))
}
