//! Post-login domain restriction.

use crate::error::{ConsoleError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@([^@\s]+\.[^@\s]+)$").expect("email pattern is valid")
});

/// Allow-list of email domains for federated logins.
///
/// An empty allow-list admits every account.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    allowed: Vec<String>,
}

impl DomainPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches('@').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Checks the email carried by a completed login.
    ///
    /// A missing or malformed email fails a restricted policy.
    pub fn check(&self, email: Option<&str>) -> Result<()> {
        if self.is_unrestricted() {
            return Ok(());
        }
        let email = email.map(str::trim).unwrap_or_default();
        let domain = EMAIL_RE
            .captures(email)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_lowercase());

        match domain {
            Some(domain) if self.allowed.iter().any(|a| *a == domain) => Ok(()),
            _ => Err(ConsoleError::DomainRestricted {
                email: email.to_string(),
            }),
        }
    }
}
