//! # Transport
//!
//! The generic "perform a network call" capability. Everything that talks
//! to the catalog goes through a [`Transport`], which is what lets the
//! instrumentation layer wrap calls without knowing about endpoints.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::error::ApiError;
use crate::config::WhiskersConfig;

/// HTTP verb of a catalog call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A single outbound call, relative to the configured base url
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::Post, path);
        request.body = Some(body);
        request
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Look up a query parameter by key
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable name used in errors and logs, e.g. `GET /breeds`
    pub fn resource(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Raw response of a successful call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub resource: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode {
            resource: self.resource.clone(),
            message: e.to_string(),
        })
    }
}

/// Download progress of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes received so far
    pub loaded: u64,
    /// Expected size, when the server announced one
    pub total: Option<u64>,
}

/// Progress callback injected into every call
pub type ProgressFn<'a> = dyn Fn(TransferProgress) + Send + Sync + 'a;

/// Progress callback for callers that do not track downloads
pub fn no_progress(_: TransferProgress) {}

/// Performs catalog calls
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: ApiRequest,
        on_progress: &ProgressFn<'_>,
    ) -> Result<ApiResponse, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(
        &self,
        request: ApiRequest,
        on_progress: &ProgressFn<'_>,
    ) -> Result<ApiResponse, ApiError> {
        (**self).send(request, on_progress).await
    }
}

/// reqwest-backed transport for the real catalog
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &WhiskersConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("whiskers/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );

        if !request.query.is_empty() {
            let query: Vec<String> = request
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }

        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: ApiRequest,
        on_progress: &ProgressFn<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request);
        let resource = request.resource();

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let mut response = builder.send().await?;
        let status = response.status();
        let total = response.content_length();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            on_progress(TransferProgress {
                loaded: body.len() as u64,
                total,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { resource });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                resource,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            resource,
            body,
        })
    }
}
