//! Login primitives consumed by the session layer.

use crate::error::Result;
use crate::session::UserProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username/password pair for credential login.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What a successful login hands back.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl LoginOutcome {
    /// Email asserted by the identity provider, if any.
    pub fn email(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.email.as_deref())
    }
}

impl fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginOutcome")
            .field("token", &"***")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Exchanges credentials or an identity-provider token for a session token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome>;

    /// Exchanges a federated identity token. The outcome's profile carries
    /// the email the provider asserted.
    async fn login_federated(&self, id_token: &str) -> Result<LoginOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secrets_not_in_debug() {
        let creds = Credentials::new("ops", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));

        let outcome = LoginOutcome {
            token: "tok-secret".into(),
            profile: None,
        };
        assert!(!format!("{:?}", outcome).contains("tok-secret"));
    }

    #[test]
    fn test_outcome_decoding() {
        let outcome: LoginOutcome = serde_json::from_value(json!({
            "accessToken": "t1",
            "profile": {"email": "a@merx.io", "name": "Ann"}
        }))
        .unwrap();
        assert_eq!(outcome.token, "t1");
        assert_eq!(outcome.email(), Some("a@merx.io"));
    }
}
