//! `arcana bot show | set`.

use anyhow::Result;
use arcana_application::AppContext;
use arcana_core::bot::DEFAULT_BOT_NAME;
use colored::Colorize;

use crate::output;

pub async fn show(ctx: &AppContext) -> Result<()> {
    match ctx.persona.current().await? {
        Some(personality) => {
            println!("{} {}", "Name:".bold(), personality.name);
            println!("{} {}", "Style:".bold(), personality.style);
        }
        None => output::hint(format!(
            "Using the default reader, {DEFAULT_BOT_NAME}. The first `arcana bot set` is free."
        )),
    }
    Ok(())
}

pub async fn set(ctx: &AppContext, name: &str, style: &str) -> Result<()> {
    let saved = ctx.persona.save(name, style).await?;
    match saved.charged {
        Some(receipt) => output::success(format!(
            "{} is ready. Charged {} RMB, balance {}.",
            saved.personality.name,
            receipt.amount(),
            receipt.balance()
        )),
        None => output::success(format!("{} is ready.", saved.personality.name)),
    }
    Ok(())
}
