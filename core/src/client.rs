//! Request builder, executor and response classifier for the items API.
//!
//! # Design
//! `QiitaClient` is read-only after construction, so one instance can be
//! cloned into any number of concurrent tasks. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; the async method in between runs the request
//! through the configured `Transport` and observes the caller's
//! `CancellationToken`.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Level;
use url::Url;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::logger::{Logger, TracingLogger};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Item, ItemsOutcome};

pub const DEFAULT_USER_AGENT: &str = concat!("qiita-rs/", env!("CARGO_PKG_VERSION"));

/// Async client for the items API.
#[derive(Clone)]
pub struct QiitaClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    token: String,
    logger: Arc<dyn Logger>,
    user_agent: String,
}

impl QiitaClient {
    /// Create a client with the default transport.
    ///
    /// Fails with `ApiError::InvalidUrl` if `base_url` is not an absolute URL
    /// that can carry a path. No network I/O happens here.
    ///
    /// With `logger` set to `None` diagnostics go to `TracingLogger`, which is
    /// silent unless the application installs a `tracing` subscriber.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        logger: Option<Arc<dyn Logger>>,
    ) -> Result<Self, ApiError> {
        let mut builder = Self::builder(base_url).token(token);
        if let Some(logger) = logger {
            builder = builder.logger(logger);
        }
        builder.build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch one page of a user's items.
    pub async fn user_items(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Item>, ApiError> {
        self.user_items_with_headers(cancel, user_id, page, per_page, &[])
            .await
    }

    /// Like `user_items`, with extra headers that replace the defaults of the
    /// same name.
    pub async fn user_items_with_headers(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
        page: u32,
        per_page: u32,
        headers: &[(String, String)],
    ) -> Result<Vec<Item>, ApiError> {
        let mut request = self.build_user_items(user_id, page, per_page)?;
        for (name, value) in headers {
            request.set_header(name, value.as_str());
        }
        let response = self.execute(request, cancel).await?;
        self.parse_user_items(user_id, response)
    }

    /// An empty `user_id` adds no path segment, and the `url` crate skips `.`
    /// and `..`, so any of these targets `/users/items` instead of a user.
    pub fn build_user_items(
        &self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            &["users", user_id, "items"],
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
            &[],
        )
    }

    /// Build a GET request for `path` relative to the base URL.
    ///
    /// Empty path segments are dropped and each remaining segment is
    /// percent-encoded, so `users/{id}/items` joins onto `/api/v2` or
    /// `/api/v2/` as `/api/v2/users/{id}/items`. Query pairs are merged with
    /// any already on the base URL and sorted by key. `headers` replace the
    /// default user-agent, authorization and content-type headers by name.
    pub fn build_request(
        &self,
        path: &[&str],
        query: &[(&str, String)],
        headers: &[(String, String)],
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| invalid_url(self.base_url.as_str(), "URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(path.iter().filter(|segment| !segment.is_empty()));

        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.extend(query.iter().map(|(key, value)| (key.to_string(), value.clone())));
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&pairs);
        }

        let mut request = HttpRequest {
            url,
            headers: vec![
                ("user-agent".to_string(), self.user_agent.clone()),
                ("authorization".to_string(), format!("Bearer {}", self.token)),
                ("content-type".to_string(), "application/json".to_string()),
            ],
        };
        for (name, value) in headers {
            request.set_header(name, value.as_str());
        }
        Ok(request)
    }

    /// Send `request` through the transport.
    ///
    /// A token that is already cancelled fails before dispatch. Cancellation
    /// while in flight drops the transport future and fails with
    /// `ApiError::Cancelled`.
    pub async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ApiError> {
        let target = format!("GET {}", request.url);
        if cancel.is_cancelled() {
            self.logger
                .log(Level::WARN, &format!("{target}: cancelled before dispatch"));
            return Err(ApiError::Cancelled);
        }

        self.logger.log(Level::DEBUG, &format!("sending {target}"));
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.transport.send(request, cancel) => result,
        };

        match result {
            Ok(response) => {
                self.logger.log(
                    Level::DEBUG,
                    &format!("{target}: status {}, {} bytes", response.status, response.body.len()),
                );
                Ok(response)
            }
            Err(err) => {
                let err = ApiError::from(err);
                self.logger.log(Level::WARN, &format!("{target}: {err}"));
                Err(err)
            }
        }
    }

    /// Classify a user-items response by status. Only a 200 whose body does
    /// not decode is an `Err` here.
    pub fn classify_user_items(
        &self,
        user_id: &str,
        response: HttpResponse,
    ) -> Result<ItemsOutcome, ApiError> {
        let outcome = match response.status {
            200 => ItemsOutcome::Items(serde_json::from_slice(&response.body)?),
            400 => ItemsOutcome::InvalidParameters,
            404 => ItemsOutcome::UserNotFound(user_id.to_string()),
            status => {
                self.logger.log(
                    Level::DEBUG,
                    &format!("unexpected status {status} body: {}", response.body_text()),
                );
                ItemsOutcome::UnexpectedStatus(status)
            }
        };
        Ok(outcome)
    }

    pub fn parse_user_items(
        &self,
        user_id: &str,
        response: HttpResponse,
    ) -> Result<Vec<Item>, ApiError> {
        self.classify_user_items(user_id, response)?.into_result()
    }
}

impl fmt::Debug for QiitaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QiitaClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Configures and validates a `QiitaClient`.
pub struct ClientBuilder {
    base_url: String,
    token: String,
    logger: Option<Arc<dyn Logger>>,
    transport: Option<Arc<dyn Transport>>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: String::new(),
            logger: None,
            transport: None,
            user_agent: None,
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use `client` through the default `ReqwestTransport`.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(ReqwestTransport::new(client)))
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<QiitaClient, ApiError> {
        let base_url = parse_base_url(&self.base_url)?;
        Ok(QiitaClient {
            base_url,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::default())),
            token: self.token,
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

/// Parse and normalize a base URL: repeated and trailing slashes in the path
/// are collapsed so later joins never produce `//`.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw).map_err(|e| invalid_url(raw, &e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid_url(raw, "URL cannot be used as a base"));
    }
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    let path = format!("/{}", segments.join("/"));
    url.set_path(&path);
    Ok(url)
}

fn invalid_url(url: &str, reason: &str) -> ApiError {
    ApiError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
