use super::explain;
use anyhow::{Result, bail};
use colored::Colorize;
use merx_application::ConsoleContext;
use merx_core::auth::Credentials;
use merx_core::session::{ActivitySignal, SessionState};
use std::str::FromStr;

pub async fn status(ctx: &ConsoleContext) -> Result<()> {
    let snapshot = ctx.monitor.snapshot().await;
    match snapshot.state {
        SessionState::Authenticated => {
            let idle_secs = snapshot.idle_millis.unwrap_or(0) / 1_000;
            let remaining = ctx.config.session.timeout_secs as i64 - idle_secs;
            println!("{} (idle {}s, expires in {}s)", "Signed in".green(), idle_secs, remaining.max(0));
            if let Some(profile) = ctx.monitor.profile().await.map_err(explain)? {
                if let Some(email) = profile.email {
                    println!("  account: {}", email);
                }
            }
        }
        SessionState::Unauthenticated => println!("{}", "Signed out".yellow()),
    }
    Ok(())
}

pub async fn login(
    ctx: &ConsoleContext,
    username: Option<String>,
    password: Option<String>,
    federated_token: Option<String>,
) -> Result<()> {
    let profile = match (username, password, federated_token) {
        (Some(username), Some(password), None) => ctx
            .auth
            .login_with_credentials(&Credentials::new(username, password))
            .await
            .map_err(explain)?,
        (None, None, Some(token)) => ctx.auth.login_federated(&token).await.map_err(explain)?,
        _ => bail!("Pass either --username/--password or --federated-token"),
    };

    let who = profile
        .display_name
        .or(profile.email)
        .unwrap_or_else(|| "operator".to_string());
    println!("{} as {}", "Signed in".green(), who.bold());
    Ok(())
}

pub async fn logout(ctx: &ConsoleContext) -> Result<()> {
    ctx.auth.logout().await.map_err(explain)?;
    println!("{}", "Signed out".yellow());
    Ok(())
}

pub async fn touch(ctx: &ConsoleContext, signal: &str) -> Result<()> {
    let Ok(signal) = ActivitySignal::from_str(signal) else {
        bail!("Unknown activity signal '{}'", signal);
    };
    if !ctx.monitor.is_authenticated() {
        return Err(explain(merx_core::ConsoleError::SessionExpired));
    }
    if ctx.auth.record_activity(signal).await.map_err(explain)? {
        println!("{}", "Activity recorded".green());
    } else {
        println!("{}", "Activity not recorded (throttled or not qualifying)".dimmed());
    }
    Ok(())
}
