mod common;

use async_trait::async_trait;
use common::{Harness, T0};
use merx_application::AuthUseCase;
use merx_core::auth::{Authenticator, Credentials, LoginOutcome};
use merx_core::session::{
    ActivitySignal, DomainPolicy, MemorySessionStore, SessionLivenessMonitor, SessionState,
    SessionStore, UserProfile,
};
use merx_core::{ConsoleError, Result};
use merx_infrastructure::FileSessionStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Authenticator that hands back a fixed outcome.
struct StubAuthenticator {
    email: Option<String>,
    reject: bool,
    calls: AtomicUsize,
}

impl StubAuthenticator {
    fn with_email(email: Option<&str>) -> Self {
        Self {
            email: email.map(str::to_string),
            reject: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn rejecting() -> Self {
        Self {
            email: None,
            reject: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn outcome(&self) -> Result<LoginOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(ConsoleError::Authentication("bad credentials".to_string()));
        }
        Ok(LoginOutcome {
            token: "session-token".to_string(),
            profile: Some(UserProfile {
                email: self.email.clone(),
                display_name: Some("Operator".to_string()),
                ..Default::default()
            }),
        })
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginOutcome> {
        self.outcome()
    }

    async fn login_federated(&self, _id_token: &str) -> Result<LoginOutcome> {
        self.outcome()
    }
}

fn usecase(harness: &Harness, authenticator: StubAuthenticator, allowed: &[&str]) -> AuthUseCase {
    AuthUseCase::new(
        harness.monitor.clone(),
        Arc::new(authenticator),
        DomainPolicy::new(allowed),
    )
}

#[tokio::test]
async fn test_federated_login_in_allowed_domain() {
    let harness = Harness::new();
    let auth = usecase(&harness, StubAuthenticator::with_email(Some("ops@merx.io")), &["merx.io"]);

    let profile = auth.login_federated("id-token").await.unwrap();

    assert_eq!(profile.email.as_deref(), Some("ops@merx.io"));
    assert_eq!(harness.monitor.state(), SessionState::Authenticated);
    assert_eq!(harness.store.get_token().await.unwrap().as_deref(), Some("session-token"));
    assert_eq!(harness.store.get_last_activity().await.unwrap(), Some(T0));
}

#[tokio::test]
async fn test_federated_login_outside_domain_rolls_back() {
    let harness = Harness::new();
    let auth = usecase(
        &harness,
        StubAuthenticator::with_email(Some("someone@gmail.com")),
        &["merx.io"],
    );
    let state_rx = harness.monitor.subscribe();

    let err = auth.login_federated("id-token").await.unwrap_err();

    assert!(matches!(err, ConsoleError::DomainRestricted { ref email } if email == "someone@gmail.com"));
    assert_eq!(harness.monitor.state(), SessionState::Unauthenticated);
    assert!(harness.store.get_token().await.unwrap().is_none());
    assert!(harness.store.get_profile().await.unwrap().is_none());
    assert_eq!(harness.store.activity_writes(), 0);
    // Subscribers never observe the rejected account as signed in.
    assert!(!state_rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_rejected_federated_login_ends_previous_session() {
    let harness = Harness::signed_in().await;
    let auth = usecase(
        &harness,
        StubAuthenticator::with_email(Some("someone@gmail.com")),
        &["merx.io"],
    );

    let err = auth.login_federated("id-token").await.unwrap_err();

    assert!(matches!(err, ConsoleError::DomainRestricted { .. }));
    assert!(!harness.monitor.is_authenticated());
    assert!(harness.store.get_token().await.unwrap().is_none());
}

/// Store that accepts writes but cannot be cleared.
#[derive(Default)]
struct UnclearableStore {
    inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for UnclearableStore {
    async fn get_token(&self) -> Result<Option<String>> {
        self.inner.get_token().await
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.inner.set_token(token).await
    }

    async fn get_last_activity(&self) -> Result<Option<i64>> {
        self.inner.get_last_activity().await
    }

    async fn set_last_activity(&self, epoch_millis: i64) -> Result<()> {
        self.inner.set_last_activity(epoch_millis).await
    }

    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        self.inner.get_profile().await
    }

    async fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.inner.set_profile(profile).await
    }

    async fn clear(&self) -> Result<()> {
        Err(ConsoleError::io("session file is read-only"))
    }
}

#[tokio::test]
async fn test_rejected_account_never_reaches_store_when_clear_fails() {
    let harness = Harness::new();
    let store = Arc::new(UnclearableStore::default());
    let monitor = Arc::new(SessionLivenessMonitor::new(
        store.clone(),
        harness.clock.clone(),
        Default::default(),
    ));
    let auth = AuthUseCase::new(
        monitor,
        Arc::new(StubAuthenticator::with_email(Some("someone@gmail.com"))),
        DomainPolicy::new(&["merx.io"]),
    );

    let err = auth.login_federated("id-token").await.unwrap_err();
    assert!(matches!(err, ConsoleError::DomainRestricted { .. }));

    // A restart finds nothing to restore.
    harness.clock.advance_secs(60);
    let restarted = SessionLivenessMonitor::new(store.clone(), harness.clock.clone(), Default::default());
    assert!(store.get_token().await.unwrap().is_none());
    // Bootstrap tries to clear leftovers and reports the read-only store.
    assert!(restarted.bootstrap().await.is_err());
    assert!(!restarted.is_authenticated());
}

#[tokio::test]
async fn test_federated_login_without_email_fails_restricted_policy() {
    let harness = Harness::new();
    let auth = usecase(&harness, StubAuthenticator::with_email(None), &["merx.io"]);

    let err = auth.login_federated("id-token").await.unwrap_err();

    assert!(matches!(err, ConsoleError::DomainRestricted { .. }));
    assert!(!harness.monitor.is_authenticated());
}

#[tokio::test]
async fn test_unrestricted_policy_admits_any_federated_login() {
    let harness = Harness::new();
    let auth = usecase(&harness, StubAuthenticator::with_email(None), &[]);

    auth.login_federated("id-token").await.unwrap();
    assert!(harness.monitor.is_authenticated());
}

#[tokio::test]
async fn test_credential_login_is_not_domain_checked() {
    let harness = Harness::new();
    let auth = usecase(
        &harness,
        StubAuthenticator::with_email(Some("contractor@elsewhere.net")),
        &["merx.io"],
    );

    auth.login_with_credentials(&Credentials::new("contractor", "pw"))
        .await
        .unwrap();
    assert!(harness.monitor.is_authenticated());
}

#[tokio::test]
async fn test_rejected_login_leaves_session_untouched() {
    let harness = Harness::new();
    let auth = usecase(&harness, StubAuthenticator::rejecting(), &[]);

    let err = auth
        .login_with_credentials(&Credentials::new("ops", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Authentication(_)));
    assert_eq!(harness.monitor.state(), SessionState::Unauthenticated);
    assert!(harness.store.get_token().await.unwrap().is_none());
}

#[tokio::test]
async fn test_activity_is_throttled_through_usecase() {
    let harness = Harness::new();
    let auth = usecase(&harness, StubAuthenticator::with_email(None), &[]);
    auth.login_federated("id-token").await.unwrap();
    let writes_after_login = harness.store.activity_writes();

    harness.clock.advance_secs(30);
    assert!(!auth.record_activity(ActivitySignal::KeyDown).await.unwrap());
    harness.clock.advance_secs(31);
    assert!(auth.record_activity(ActivitySignal::PointerDown).await.unwrap());
    harness.clock.advance_secs(5);
    assert!(!auth.record_activity(ActivitySignal::PointerMove).await.unwrap());

    assert_eq!(harness.store.activity_writes(), writes_after_login + 1);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let harness = Harness::signed_in().await;
    let auth = usecase(&harness, StubAuthenticator::with_email(None), &[]);

    auth.logout().await.unwrap();
    auth.logout().await.unwrap();

    assert_eq!(harness.monitor.state(), SessionState::Unauthenticated);
    assert!(harness.store.get_token().await.unwrap().is_none());
}

#[tokio::test]
async fn test_bootstrap_restores_session_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");

    // A previous run left a token without an activity stamp.
    std::fs::write(&path, "auth_token = \"legacy\"\n").unwrap();

    let harness = Harness::new();
    let monitor = Arc::new(SessionLivenessMonitor::new(
        Arc::new(FileSessionStore::new(path.clone())),
        harness.clock.clone(),
        Default::default(),
    ));
    let auth = AuthUseCase::new(
        monitor.clone(),
        Arc::new(StubAuthenticator::with_email(None)),
        DomainPolicy::default(),
    );

    assert_eq!(auth.bootstrap().await.unwrap(), SessionState::Authenticated);

    let reopened = FileSessionStore::new(path);
    assert_eq!(reopened.get_last_activity().await.unwrap(), Some(T0));
    assert_eq!(monitor.require_token().await.unwrap(), "legacy");
}
