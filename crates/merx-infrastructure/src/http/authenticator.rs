//! HTTP login exchanges.

use super::client::ApiClient;
use async_trait::async_trait;
use merx_core::auth::{Authenticator, Credentials, LoginOutcome};
use merx_core::{ConsoleError, Result};
use serde_json::{Value, json};

/// Posts to `auth/login` and `auth/federated`.
#[derive(Clone)]
pub struct HttpAuthenticator {
    client: ApiClient,
}

impl HttpAuthenticator {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn exchange(&self, segments: &[&str], body: &Value) -> Result<LoginOutcome> {
        let payload = self
            .client
            .post_json(segments, body)
            .await
            .map_err(rejected_as_authentication)?;
        decode_login(payload)
    }
}

/// 401/403 from the auth endpoints mean bad credentials, not a broken link.
fn rejected_as_authentication(err: ConsoleError) -> ConsoleError {
    match err {
        ConsoleError::Transport {
            status: Some(401 | 403),
            message,
        } => ConsoleError::Authentication(message),
        other => other,
    }
}

/// Accepts `{token, profile}` directly or wrapped in `{"data": ...}`.
fn decode_login(payload: Value) -> Result<LoginOutcome> {
    let body = match payload {
        Value::Object(mut map) if !map.contains_key("token") && !map.contains_key("accessToken") => {
            map.remove("data").unwrap_or(Value::Object(map))
        }
        other => other,
    };
    let outcome: LoginOutcome = serde_json::from_value(body)
        .map_err(|e| ConsoleError::Authentication(format!("malformed login response: {}", e)))?;
    if outcome.token.trim().is_empty() {
        return Err(ConsoleError::Authentication(
            "login response carried an empty token".to_string(),
        ));
    }
    Ok(outcome)
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        tracing::debug!("[HttpAuthenticator] Credential login for '{}'", credentials.username);
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });
        self.exchange(&["auth", "login"], &body).await
    }

    async fn login_federated(&self, id_token: &str) -> Result<LoginOutcome> {
        tracing::debug!("[HttpAuthenticator] Federated token exchange");
        self.exchange(&["auth", "federated"], &json!({ "idToken": id_token }))
            .await
    }
}
