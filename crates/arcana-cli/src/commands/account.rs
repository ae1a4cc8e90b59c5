//! `arcana login | signup | verify | reset | logout | whoami`.

use anyhow::Result;
use arcana_application::AppContext;
use colored::Colorize;

use crate::output;
use crate::prompt::ask;

pub async fn login(ctx: &AppContext, login: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => ask("Password: ")?,
    };
    let user = ctx.auth.login(login, &password).await?;

    if ctx.auth.take_first_login().await? {
        output::success(format!("Welcome, {}! ✨", user.name));
    } else {
        output::success(format!("Welcome back, {}.", user.name));
    }
    println!("Balance: {}", ctx.ledger.balance());
    Ok(())
}

pub async fn signup(ctx: &AppContext, name: &str, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => ask("Choose a password: ")?,
    };
    let message = ctx.auth.signup(name, email, &password).await?;
    output::success(message);
    output::hint(format!("Verify your address with `arcana verify {email}`."));
    Ok(())
}

/// Sends a verification code and checks the one the user types back.
pub async fn verify(ctx: &AppContext, login: &str) -> Result<()> {
    let sent = ctx.auth.send_code(login).await?;
    output::hint(sent);
    let code = ask("Code: ")?;
    let message = ctx.auth.verify_code(login, &code).await?;
    output::success(message);
    Ok(())
}

pub async fn reset(ctx: &AppContext, login: &str) -> Result<()> {
    let ticket = ctx.auth.request_reset(login).await?;
    output::hint(format!("A reset code was sent to {}.", ticket.login));
    let code = ask("Code: ")?;
    let new_password = ask("New password: ")?;
    let message = ctx
        .auth
        .set_new_password(&ticket, &code, &new_password)
        .await?;
    output::success(message);
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout().await?;
    output::success("Logged out.");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.auth.current_user().await? {
        Some(user) => {
            println!("{} {}", "Name:".bold(), user.name);
            if let Some(email) = &user.email {
                println!("{} {email}", "Email:".bold());
            }
            println!("{} {}", "Coins:".bold(), user.points);
            if let Some(code) = &user.referral_code {
                println!("{} {code}", "Referral code:".bold());
            }
            println!("{} {}", "Balance:".bold(), ctx.wallet.balance().await);
        }
        None => output::hint("Not logged in. Use `arcana login <email|phone>`."),
    }
    Ok(())
}
