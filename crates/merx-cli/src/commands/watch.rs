use super::explain;
use anyhow::{Context, Result};
use colored::Colorize;
use merx_application::ConsoleContext;
use merx_core::ConsoleError;

/// Runs the liveness scheduler in the foreground.
pub async fn run(ctx: &ConsoleContext) -> Result<()> {
    if !ctx.monitor.is_authenticated() {
        return Err(explain(ConsoleError::SessionExpired));
    }

    let scheduler = ctx.liveness_scheduler();
    let cancel = scheduler.cancellation_token();
    let mut handle = scheduler.spawn();

    println!(
        "Watching session (timeout {}s, check every {}s). Ctrl-C to stop.",
        ctx.config.session.timeout_secs, ctx.config.session.check_interval_secs
    );

    tokio::select! {
        joined = &mut handle => {
            joined.context("Liveness scheduler panicked")?;
            println!("{}", "Session ended".yellow());
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            cancel.cancel();
            handle.await.context("Liveness scheduler panicked")?;
            println!("{}", "Stopped watching; session left as is".dimmed());
        }
    }
    Ok(())
}
