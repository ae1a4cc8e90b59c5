//! `arcana chat`: the billed tarot chat REPL.

use anyhow::Result;
use arcana_application::{AppContext, ChatSession, SessionEvent, SessionStatus};
use arcana_core::billing::GateState;
use arcana_core::error::ArcanaError;
use arcana_core::tarot::{DRAW_SIZES, POOL_SIZES, ReadingIssue};
use colored::Colorize;
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use crate::output;
use crate::prompt::{Input, LineReader};

const COMMANDS: &[&str] = &["/recharge", "/reading", "/status", "/balance", "/help", "/quit"];

/// The REPL's input side: the line editor raced against session events.
struct Console {
    reader: LineReader,
    events: broadcast::Receiver<SessionEvent>,
}

impl Console {
    /// Prompts and waits for input, announcing expiry while waiting.
    async fn read(&mut self, prompt: &str) -> Input {
        if !self.reader.prompt(prompt) {
            return Input::Closed;
        }
        loop {
            tokio::select! {
                input = self.reader.next() => return input,
                event = self.events.recv() => {
                    if let Ok(SessionEvent::Expired { balance }) = event {
                        println!();
                        println!("{}", "⏰ Your chat time is up.".yellow().bold());
                        output::hint(format!("Balance: {balance}. Type /recharge to continue."));
                    }
                }
            }
        }
    }
}

pub async fn run(ctx: &AppContext, resume: Option<&str>) -> Result<()> {
    let session = ctx.open_chat(resume).await?;
    let mut console = Console {
        reader: LineReader::spawn(COMMANDS)?,
        events: session.subscribe(),
    };

    println!("{}", "=== Arcana Tarot Chat ===".bright_magenta().bold());
    for message in session.messages().await {
        output::print_message(&message);
    }
    let status = session.status().await;
    if status.state == GateState::Free {
        output::success(format!(
            "Your first session is free: {} of chat time.",
            output::clock(status.budget)
        ));
    }
    output::hint("Type a question, /reading for a guided reading, /help for commands.");
    println!();
    session.start().await;

    loop {
        let status = session.status().await;
        let line = match console.read(&prompt_for(&status)).await {
            Input::Line(line) => line,
            Input::Interrupted => {
                output::hint("CTRL-C detected. Type /quit to exit.");
                continue;
            }
            Input::Closed => break,
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" | "quit" | "exit" => break,
            "/help" => print_help(ctx),
            "/status" => print_status(&status),
            "/balance" => println!("Balance: {}", ctx.wallet.balance().await),
            "/recharge" => recharge(ctx, &session).await,
            "/reading" => reading(&session, &mut console).await,
            command if command.starts_with('/') => {
                output::hint("Unknown command. Type /help.");
            }
            text => match session.send_message(text).await {
                Ok(reply) => output::print_message(&reply),
                Err(e) => report(ctx, &e),
            },
        }
    }

    session.stop().await;
    output::success("Goodbye!");
    Ok(())
}

fn prompt_for(status: &SessionStatus) -> String {
    match status.state {
        GateState::Expired => "[time up] >> ".to_string(),
        GateState::Free => format!("[free {}] >> ", output::clock(status.remaining)),
        GateState::Active => format!("[{}] >> ", output::clock(status.remaining)),
    }
}

fn print_help(ctx: &AppContext) {
    let policy = ctx.policy();
    println!("  /reading   guided tarot reading");
    println!(
        "  /recharge  buy {} s more for {} RMB",
        policy.extension_secs, policy.extension_price
    );
    println!("  /status    remaining time");
    println!("  /balance   wallet balance");
    println!("  /quit      leave the chat");
}

fn print_status(status: &SessionStatus) {
    println!(
        "Session {}: {:?}, {} left of {} (balance {})",
        status.session_id,
        status.state,
        output::clock(status.remaining),
        output::clock(status.budget),
        status.balance
    );
}

fn report(ctx: &AppContext, error: &ArcanaError) {
    output::alert_arcana(error);
    match error {
        ArcanaError::InputBlocked => output::hint(format!(
            "Type /recharge to buy {} s for {} RMB.",
            ctx.policy().extension_secs,
            ctx.policy().extension_price
        )),
        ArcanaError::InsufficientFunds { .. } => {
            output::hint("Top up with `arcana wallet recharge <method> <amount>`.")
        }
        _ => {}
    }
}

async fn recharge(ctx: &AppContext, session: &ChatSession) {
    match session.extend().await {
        Ok(receipt) => output::success(format!(
            "Charged {} RMB, {} s added. Balance: {}",
            receipt.amount(),
            ctx.policy().extension_secs,
            receipt.balance()
        )),
        Err(e) => report(ctx, &e),
    }
}

/// Walks the user through issue → pool → draw, printing each step.
async fn reading(session: &ChatSession, console: &mut Console) {
    let mut shown = session.messages().await.len();
    if let Err(e) = session.begin_reading().await {
        output::alert_arcana(&e);
        return;
    }
    shown = show_new(session, shown).await;

    let issues: Vec<(String, ReadingIssue)> = ReadingIssue::iter()
        .map(|issue| (issue.to_string(), issue))
        .collect();
    let Some(issue) = pick(console, "issue", &issues).await else {
        return;
    };
    if let Err(e) = session.choose_issue(issue).await {
        output::alert_arcana(&e);
        return;
    }
    shown = show_new(session, shown).await;

    let pools: Vec<(String, usize)> = POOL_SIZES.iter().map(|n| (n.to_string(), *n)).collect();
    let Some(pool) = pick(console, "pool", &pools).await else {
        return;
    };
    if let Err(e) = session.shuffle_pool(pool).await {
        output::alert_arcana(&e);
        return;
    }
    shown = show_new(session, shown).await;

    let draws: Vec<(String, usize)> = DRAW_SIZES
        .iter()
        .filter(|n| **n <= pool)
        .map(|n| (n.to_string(), *n))
        .collect();
    let Some(draw) = pick(console, "draw", &draws).await else {
        return;
    };
    output::hint("The cards are turning...");
    let result = session.draw_cards(draw).await;
    show_new(session, shown).await;
    if let Err(e) = result {
        output::alert_arcana(&e);
    }
}

/// Prints transcript messages after index `shown`; returns the new length.
async fn show_new(session: &ChatSession, shown: usize) -> usize {
    let messages = session.messages().await;
    for message in messages.iter().skip(shown) {
        output::print_message(message);
    }
    messages.len()
}

/// Lets the user pick one option by label or by its 1-based position.
async fn pick<T: Copy>(console: &mut Console, what: &str, options: &[(String, T)]) -> Option<T> {
    let labels: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, (label, _))| format!("{}) {label}", i + 1))
        .collect();
    output::hint(labels.join("  "));

    loop {
        let line = match console.read(&format!("{what} > ")).await {
            Input::Line(line) => line,
            Input::Interrupted | Input::Closed => return None,
        };
        let answer = line.trim();
        if answer.is_empty() {
            return None;
        }

        let by_label = options
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(answer));
        let by_position = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i));
        match by_label.or(by_position) {
            Some((_, value)) => return Some(*value),
            None => output::hint("Please choose one of the listed options."),
        }
    }
}
