pub mod merchants;
pub mod models;
pub mod session;
pub mod watch;

use colored::Colorize;
use merx_core::ConsoleError;

/// Turns the conditions users must act on into readable hints.
pub fn explain(err: ConsoleError) -> anyhow::Error {
    match err {
        ConsoleError::SessionExpired => {
            anyhow::anyhow!("{} run `merx login` first", "Not signed in:".red())
        }
        ConsoleError::NoDataAvailable { failed } if failed.is_empty() => {
            anyhow::anyhow!("{} no clusters are configured", "No data:".red())
        }
        ConsoleError::NoDataAvailable { failed } => anyhow::anyhow!(
            "{} every cluster failed ({})",
            "No data:".red(),
            failed.join(", ")
        ),
        ConsoleError::DomainRestricted { email } => anyhow::anyhow!(
            "{} '{}' is not in an allowed domain; you have been signed out",
            "Access denied:".red(),
            email
        ),
        err if err.is_not_found() => anyhow::anyhow!("{}", err.to_string().red()),
        other => anyhow::Error::new(other),
    }
}
