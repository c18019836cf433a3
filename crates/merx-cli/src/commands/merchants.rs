use super::explain;
use anyhow::Result;
use colored::Colorize;
use merx_application::ConsoleContext;

pub async fn list(ctx: &ConsoleContext) -> Result<()> {
    let listing = ctx.merchants.list_merchants().await.map_err(explain)?;

    if listing.is_partial() {
        eprintln!(
            "{} some clusters did not answer: {}",
            "Warning:".yellow(),
            listing.failed_partitions().join(", ")
        );
    }

    if listing.result.items.is_empty() {
        println!("{}", "No merchants".dimmed());
        return Ok(());
    }

    for tagged in &listing.result.items {
        println!(
            "{:<12} {:<32} {}",
            tagged.partition_id.cyan(),
            tagged.item.name,
            tagged.item.id.dimmed()
        );
    }
    println!(
        "{} merchant(s) from {}/{} cluster(s)",
        listing.result.items.len(),
        listing.result.succeeded_count,
        listing.result.total_count
    );
    Ok(())
}
