//! `arcana wallet ...`

use anyhow::{Context, Result};
use arcana_application::AppContext;
use arcana_core::wallet::{PaymentMethod, PaymentRedirect};
use arcana_infrastructure::ArcanaPaths;
use colored::Colorize;
use rust_decimal::Decimal;

use crate::output;

pub async fn balance(ctx: &AppContext) -> Result<()> {
    println!("{} {}", "Balance:".bold(), ctx.wallet.balance().await);
    Ok(())
}

pub async fn history(ctx: &AppContext) -> Result<()> {
    let entries = ctx.wallet.recharge_history().await?;
    if entries.is_empty() {
        output::hint("No recharges yet.");
        return Ok(());
    }
    for entry in entries {
        let when = entry
            .created_at
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let method = entry.method.as_deref().unwrap_or("-");
        println!("{when}  {:>8} RMB  {method}", entry.amount.normalize());
    }
    Ok(())
}

pub async fn recharge(
    ctx: &AppContext,
    paths: &ArcanaPaths,
    method: PaymentMethod,
    amount: Decimal,
) -> Result<()> {
    let intent = ctx.wallet.start_recharge(method, amount).await?;
    match intent.redirect {
        PaymentRedirect::Url(url) => {
            println!("Open this link to pay {} RMB with {method}:", intent.amount);
            println!("  {}", url.bright_cyan());
        }
        PaymentRedirect::HtmlForm(html) => {
            let path = paths.data_dir().join("alipay-checkout.html");
            std::fs::create_dir_all(paths.data_dir())
                .with_context(|| format!("Failed to create {}", paths.data_dir().display()))?;
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Open this page in a browser to pay {} RMB:", intent.amount);
            println!("  {}", path.display().to_string().bright_cyan());
        }
        PaymentRedirect::ClientSecret(secret) => {
            println!("Card payment prepared for {} RMB.", intent.amount);
            println!("  client secret: {}", secret.bright_black());
        }
    }
    if method == PaymentMethod::PayPal {
        output::hint("After approving, run `arcana wallet capture <order-id>`.");
    } else {
        output::hint("Your balance updates once the provider confirms; check `arcana wallet balance`.");
    }
    Ok(())
}

pub async fn capture(ctx: &AppContext, order_id: &str) -> Result<()> {
    let balance = ctx.wallet.capture_paypal(order_id).await?;
    output::success(format!("Payment received. Balance: {balance}"));
    Ok(())
}
