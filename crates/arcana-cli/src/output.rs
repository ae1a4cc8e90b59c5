//! Terminal rendering helpers.

use arcana_core::error::ArcanaError;
use arcana_core::session::{ChatMessage, MessageBody, Sender};
use colored::Colorize;

/// Prints an error the way the screens showed alerts: short title, message.
pub fn alert(error: &anyhow::Error) {
    match error.downcast_ref::<ArcanaError>() {
        Some(arcana) => alert_arcana(arcana),
        None => eprintln!("{} {:#}", "Error:".red().bold(), error),
    }
}

pub fn alert_arcana(error: &ArcanaError) {
    let (title, message) = error.user_message();
    eprintln!("{} {}", format!("{title}:").red().bold(), message);
}

pub fn success(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

pub fn hint(message: impl AsRef<str>) {
    println!("{}", message.as_ref().bright_black());
}

/// `m:ss` form of a second count.
pub fn clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn print_message(message: &ChatMessage) {
    match (&message.sender, &message.body) {
        (Sender::User, MessageBody::Text { text }) => {
            println!("{}", format!("> {text}").green());
        }
        (Sender::Bot, MessageBody::Text { text }) => {
            for line in text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        (_, MessageBody::Card { card }) => {
            println!("{}", format!("🂠 {}", card.name).bright_magenta().bold());
            println!("  {}", card.meaning.magenta());
            println!("  {}", card.image.bright_black());
        }
    }
}
