//! `arcana points` and `arcana check-in`.

use anyhow::Result;
use arcana_application::AppContext;
use arcana_core::points::CheckInStatus;
use colored::Colorize;

use crate::output;

pub async fn points(ctx: &AppContext) -> Result<()> {
    println!("{} {}", "Coins:".bold(), ctx.points.points().await?);
    Ok(())
}

pub async fn check_in(ctx: &AppContext, status_only: bool) -> Result<()> {
    let status = if status_only {
        ctx.points.check_in_status().await?
    } else {
        ctx.points.check_in().await?
    };

    if status_only {
        if status.already_checked_in {
            output::hint("Already checked in today.");
        } else {
            output::hint("Not checked in yet today.");
        }
    } else if status.already_checked_in {
        output::hint("You already checked in today. Come back tomorrow!");
    } else {
        let reward = status.today_reward.unwrap_or_default();
        output::success(format!("Checked in! +{reward} coins"));
    }
    print_streak(&status);
    Ok(())
}

fn print_streak(status: &CheckInStatus) {
    println!("{} day {} of 7", "Streak:".bold(), status.streak);
    for record in &status.history {
        println!("  {}  +{}", record.date, record.coins);
    }
    if let Some(points) = status.new_points {
        println!("{} {points}", "Coins:".bold());
    }
}
