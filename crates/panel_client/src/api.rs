use std::time::Duration;

use panel_protocol::{CheckResponse, FieldId, RunResponse};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Server base, e.g. `http://localhost:8080/pub2tools`; endpoint paths
    /// are joined below it.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Pipeline runs fetch publications and webpages server-side, so this
    /// is generous by default.
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/pub2tools".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    Timeout,
    Network,
    /// The body was not a decodable response, whatever the status line said.
    Decode,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Decode => write!(f, "undecodable response"),
        }
    }
}

/// POSTs a JSON body and returns the response body text.
///
/// The server reports failures inside the JSON body rather than through the
/// status line, so implementations must return the body for any completed
/// HTTP exchange, whatever its status code.
#[async_trait::async_trait]
pub trait ApiTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let joined = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        reqwest::Url::parse(&joined)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiTransport for ReqwestTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        response.text().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}

/// Issues one field check and decodes the response.
pub async fn send_check(
    transport: &dyn ApiTransport,
    field: FieldId,
    body: &Value,
) -> Result<CheckResponse, ApiError> {
    let path = field.check_path().ok_or_else(|| {
        ApiError::new(
            ApiErrorKind::InvalidUrl,
            format!("field {} has no check endpoint", field.id()),
        )
    })?;
    let text = transport.post_json(path, body).await?;
    serde_json::from_str(&text).map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
}

/// Issues one pipeline run and decodes the response.
pub async fn send_run(
    transport: &dyn ApiTransport,
    body: &Value,
) -> Result<RunResponse, ApiError> {
    let text = transport.post_json("api", body).await?;
    serde_json::from_str(&text).map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
}
