//! `arcana language [<code>]`.

use anyhow::Result;
use arcana_application::AppContext;
use arcana_core::language::Language;

use crate::output;

pub async fn run(ctx: &AppContext, code: Option<Language>) -> Result<()> {
    match code {
        Some(lang) => {
            ctx.language.set(lang).await?;
            output::success(format!("Language set to {lang}."));
        }
        None => println!("{}", ctx.language.current()),
    }
    Ok(())
}
