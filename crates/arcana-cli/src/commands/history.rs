//! `arcana history list | show | delete`.

use anyhow::Result;
use arcana_application::AppContext;
use colored::Colorize;

use crate::output;

pub async fn list(ctx: &AppContext, filter: Option<&str>) -> Result<()> {
    let sessions = ctx.history.list(filter).await?;
    if sessions.is_empty() {
        output::hint("No chat sessions found.");
        return Ok(());
    }
    for meta in sessions {
        let when = meta.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
        println!("{}  {}  {}", meta.id.bright_black(), when, meta.title);
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, session_id: &str) -> Result<()> {
    for message in ctx.history.open(session_id).await? {
        output::print_message(&message);
    }
    output::hint(format!("Continue with `arcana chat --resume {session_id}`."));
    Ok(())
}

pub async fn delete(ctx: &AppContext, session_id: &str) -> Result<()> {
    ctx.history.delete(session_id).await?;
    output::success(format!("Deleted {session_id}."));
    Ok(())
}
