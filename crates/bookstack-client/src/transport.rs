//! # Transport
//!
//! Builds and issues a single logical request against whichever backend
//! mode is configured, and translates the outcome into a uniform
//! payload/error shape.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Transport Request Flow                          │
//! │                                                                         │
//! │  request(method, resource, options)                                     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  write guard ──── static mode + non-GET? ──► StaticModeWriteRejected    │
//! │      │                                       (BEFORE any I/O)           │
//! │      ▼                                                                  │
//! │  ┌──────────────────────┐      ┌──────────────────────────────┐         │
//! │  │ Backend::Live        │      │ Backend::Static              │         │
//! │  │                      │      │                              │         │
//! │  │ base URL + path      │      │ resource → "<resource>.json" │         │
//! │  │ + query params       │      │ under the snapshot root;     │         │
//! │  │ one reqwest call     │      │ query params silently dropped│         │
//! │  └──────────┬───────────┘      └──────────────┬───────────────┘         │
//! │             │                                 │                         │
//! │             ▼                                 ▼                         │
//! │  204/empty → Payload::Empty        file bytes → Payload::Json           │
//! │  JSON body → Payload::Json                                              │
//! │  other body → Payload::Text                                             │
//! │  bad status → ClientError::Api { status, message, payload }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Side effects: exactly one network operation (live) or one file read
//! (static) per call — or zero, when the write guard fires.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientConfig, SourceMode};
use crate::error::{ClientError, ClientResult};

/// Fixed extension appended to snapshot resource names when absent.
const SNAPSHOT_EXTENSION: &str = ".json";

/// Generic message used when a failing response carries no usable one.
const GENERIC_FAILURE_MESSAGE: &str = "Request to server failed";

// =============================================================================
// Method
// =============================================================================

/// The HTTP-shaped verbs the transport understands, independent of
/// backend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Returns true if this method mutates backend state.
    ///
    /// Writes are the methods the static-mode guard rejects.
    pub fn is_write(&self) -> bool {
        !matches!(self, Method::Get)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

// =============================================================================
// Request Options
// =============================================================================

/// Optional parts of a transport request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body for POST/PATCH calls.
    pub body: Option<Value>,

    /// Query parameters. Honored in live mode; silently dropped in
    /// static mode (snapshots are not parameterized).
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options with a JSON body and no query parameters.
    pub fn with_body(body: Value) -> Self {
        RequestOptions {
            body: Some(body),
            query: Vec::new(),
        }
    }

    /// Options with query parameters and no body.
    pub fn with_query(query: Vec<(String, String)>) -> Self {
        RequestOptions { body: None, query }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// The decoded outcome of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured (JSON) response body.
    Json(Value),

    /// Response body of some other content kind, passed through raw.
    Text(String),

    /// No content (HTTP 204 or an empty body).
    Empty,
}

impl Payload {
    /// Decodes a JSON payload into a typed value.
    ///
    /// `Empty` and `Text` payloads are decode errors here: callers that
    /// expect them match on the variant instead.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
            }
            Payload::Text(_) => Err(ClientError::Decode(
                "expected a structured payload, got plain text".into(),
            )),
            Payload::Empty => Err(ClientError::Decode(
                "expected a structured payload, got no content".into(),
            )),
        }
    }
}

// =============================================================================
// Backend
// =============================================================================

/// The two interchangeable backends, selected once at startup.
///
/// A closed enum with exhaustive matching keeps both code paths
/// statically checkable — there is no runtime string comparison.
enum Backend {
    /// Writable remote REST API.
    Live { http: reqwest::Client, base_url: Url },

    /// Read-only directory of pre-rendered per-resource snapshots.
    Static { root: PathBuf },
}

// =============================================================================
// Transport
// =============================================================================

/// Issues one logical request per call against the configured backend.
pub struct Transport {
    backend: Backend,
}

impl Transport {
    /// Builds a transport from configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let backend = match config.mode() {
            SourceMode::Live => {
                let base_url = Url::parse(&config.api.base_url)?;
                let http = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.api.timeout_secs))
                    .build()?;
                Backend::Live { http, base_url }
            }
            SourceMode::Static => Backend::Static {
                root: config.snapshot.root.clone(),
            },
        };

        Ok(Transport { backend })
    }

    /// Returns the mode this transport was configured with.
    pub fn mode(&self) -> SourceMode {
        match &self.backend {
            Backend::Live { .. } => SourceMode::Live,
            Backend::Static { .. } => SourceMode::Static,
        }
    }

    /// Issues a single logical request.
    ///
    /// In static mode any non-GET fails with
    /// [`ClientError::StaticModeWriteRejected`] before any I/O is
    /// attempted.
    pub async fn request(
        &self,
        method: Method,
        resource: &str,
        options: RequestOptions,
    ) -> ClientResult<Payload> {
        // Fail-fast guard: never reaches the file system or the network.
        if method.is_write() {
            if let Backend::Static { .. } = self.backend {
                return Err(ClientError::StaticModeWriteRejected {
                    method: method.to_string(),
                    resource: resource.to_string(),
                });
            }
        }

        match &self.backend {
            Backend::Live { http, base_url } => {
                self.request_live(http, base_url, method, resource, options).await
            }
            Backend::Static { root } => self.request_static(root, resource, options).await,
        }
    }

    // =========================================================================
    // Live Backend
    // =========================================================================

    async fn request_live(
        &self,
        http: &reqwest::Client,
        base_url: &Url,
        method: Method,
        resource: &str,
        options: RequestOptions,
    ) -> ClientResult<Payload> {
        let url = build_rest_url(base_url, resource, &options.query)?;
        debug!(%method, %url, "Issuing live request");

        let mut request = http.request(method.as_reqwest(), url);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let body = response.text().await?;

        let payload = if status == reqwest::StatusCode::NO_CONTENT || body.is_empty() {
            Payload::Empty
        } else if is_json {
            let value: Value =
                serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
            Payload::Json(value)
        } else {
            Payload::Text(body)
        };

        if !status.is_success() {
            let (message, decoded) = failure_parts(&payload);
            warn!(%method, resource, status = status.as_u16(), "Live request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
                payload: decoded,
            });
        }

        Ok(payload)
    }

    // =========================================================================
    // Static Backend
    // =========================================================================

    async fn request_static(
        &self,
        root: &Path,
        resource: &str,
        options: RequestOptions,
    ) -> ClientResult<Payload> {
        if !options.query.is_empty() {
            // Snapshots are not parameterized; server-side filtering has
            // to be reproduced client-side by the caller.
            debug!(resource, "Dropping query parameters for static snapshot read");
        }

        let path = root.join(snapshot_name(resource));
        debug!(?path, "Reading static snapshot");

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ClientError::Snapshot {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        if contents.trim().is_empty() {
            return Ok(Payload::Empty);
        }

        let value: Value =
            serde_json::from_str(&contents).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Payload::Json(value))
    }
}

// =============================================================================
// URL / Path Construction
// =============================================================================

/// Joins a resource path and query parameters to the live base URL,
/// normalizing slashes on both sides of the join.
fn build_rest_url(base: &Url, resource: &str, query: &[(String, String)]) -> ClientResult<Url> {
    let cleaned_base = base.as_str().trim_end_matches('/');
    let cleaned_path = resource.trim_start_matches('/');

    let mut url = Url::parse(&format!("{cleaned_base}/{cleaned_path}"))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Maps a resource path to its snapshot file name, appending the fixed
/// extension when absent.
fn snapshot_name(resource: &str) -> String {
    let cleaned = resource.trim_start_matches('/');
    if cleaned.ends_with(SNAPSHOT_EXTENSION) {
        cleaned.to_string()
    } else {
        format!("{cleaned}{SNAPSHOT_EXTENSION}")
    }
}

/// Extracts the surfaced message and decoded payload from a failing
/// response: a structured body with a `message` field wins, anything else
/// falls back to the generic message.
fn failure_parts(payload: &Payload) -> (String, Option<Value>) {
    match payload {
        Payload::Json(value) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string();
            (message, Some(value.clone()))
        }
        Payload::Text(text) => (GENERIC_FAILURE_MESSAGE.to_string(), Some(Value::String(text.clone()))),
        Payload::Empty => (GENERIC_FAILURE_MESSAGE.to_string(), None),
    }
}
