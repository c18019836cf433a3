use super::explain;
use anyhow::Result;
use colored::Colorize;
use merx_application::ConsoleContext;
use merx_core::ConsoleError;

pub async fn show(ctx: &ConsoleContext, model_id: &str) -> Result<()> {
    let tree = ctx
        .models
        .resolve_tree(model_id)
        .await
        .and_then(|tree| tree.ok_or_else(|| ConsoleError::not_found("Model", model_id)))
        .map_err(explain)?;

    println!("{} {}", tree.model.name.bold(), tree.model.id.dimmed());
    if tree.knowledge_bases.is_empty() {
        println!("  {}", "no knowledge bases".dimmed());
    }
    for node in &tree.knowledge_bases {
        println!(
            "  {} {}",
            node.knowledge_base.name.cyan(),
            node.knowledge_base.id.dimmed()
        );
        if node.documents.is_empty() {
            println!("    {}", "no documents".dimmed());
        }
        for document in &node.documents {
            println!("    {} {}", document.name, document.id.dimmed());
        }
    }
    Ok(())
}

pub async fn picker(ctx: &ConsoleContext) -> Result<()> {
    let knowledge_bases = ctx.models.knowledge_base_picker().await.map_err(explain)?;
    for kb in knowledge_bases.iter() {
        let owner = kb
            .parent_model_name
            .as_deref()
            .or(kb.parent_model_id.as_deref())
            .unwrap_or("-");
        println!("{:<24} {:<24} {}", kb.id, kb.name, owner.dimmed());
    }
    Ok(())
}
