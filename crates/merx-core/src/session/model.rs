//! Session domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Externally visible authentication state.
///
/// Idleness is not a state of its own; it is computed from the last
/// activity timestamp whenever liveness is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Point-in-time view of the session, safe to display (no token value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub has_token: bool,
    /// Epoch milliseconds of the last recorded interaction.
    pub last_activity_at: Option<i64>,
    /// Milliseconds since the last recorded interaction.
    pub idle_millis: Option<i64>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }
}

/// Interaction signal reported by the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivitySignal {
    PointerDown,
    KeyDown,
    Scroll,
    TouchStart,
    PointerMove,
    Focus,
}

impl ActivitySignal {
    /// Whether the signal counts as meaningful, low-noise user activity.
    pub fn is_qualifying(self) -> bool {
        matches!(
            self,
            Self::PointerDown | Self::KeyDown | Self::Scroll | Self::TouchStart
        )
    }
}

/// Outcome of a liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessStatus {
    /// Session is live; carries the idle time in milliseconds.
    Alive { idle_millis: i64 },
    /// Session exceeded the liveness window and was logged out by this check.
    Expired { idle_millis: i64 },
    /// No session to check.
    Unauthenticated,
}

/// Cached profile of the signed-in operator.
///
/// Only the fields the core looks at are typed; everything else the backend
/// sends is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }
}
