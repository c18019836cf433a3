//! Authenticated JSON client over reqwest.

use merx_core::config::ApiConfig;
use merx_core::session::SessionLivenessMonitor;
use merx_core::{ConsoleError, Result};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const ERROR_BODY_LIMIT: usize = 200;

pub(crate) fn transport_error(err: reqwest::Error) -> ConsoleError {
    ConsoleError::transport(err.status().map(|s| s.as_u16()), err.to_string())
}

/// JSON client bound to one API base URL.
///
/// Authenticated calls take the bearer token from the liveness monitor, so a
/// request is never sent for an expired session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    monitor: Arc<SessionLivenessMonitor>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, monitor: Arc<SessionLivenessMonitor>) -> Result<Self> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ConsoleError::config(format!("invalid api.base_url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(ConsoleError::config(format!(
                "api.base_url '{}' cannot be used as a base URL",
                base
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ConsoleError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            monitor,
        })
    }

    pub fn monitor(&self) -> &Arc<SessionLivenessMonitor> {
        &self.monitor
    }

    /// Builds `base/seg1/seg2/...`, percent-encoding each segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::config("api.base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated GET returning the decoded JSON body.
    pub async fn get_json(&self, segments: &[&str]) -> Result<Value> {
        let token = self.monitor.require_token().await?;
        let url = self.url(segments)?;
        let request = self.http.request(Method::GET, url.clone()).bearer_auth(token);
        self.send(request, &url).await
    }

    /// Unauthenticated POST, used by the login exchanges.
    pub async fn post_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value> {
        let url = self.url(segments)?;
        let request = self.http.request(Method::POST, url.clone()).json(body);
        self.send(request, &url).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!("[ApiClient] {} {}", request_id, url.path());

        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                "[ApiClient] {} {} answered {}",
                request_id,
                url.path(),
                status
            );
            return Err(status_error(status, &body));
        }

        response.json::<Value>().await.map_err(|e| ConsoleError::Serialization {
            format: "JSON".to_string(),
            message: format!("{} ({})", e, url.path()),
        })
    }
}

fn status_error(status: StatusCode, body: &str) -> ConsoleError {
    let mut message = status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string();
    let body = body.trim();
    if !body.is_empty() {
        let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        message = format!("{}: {}", message, snippet);
    }
    ConsoleError::transport(Some(status.as_u16()), message)
}
