use std::process::ExitCode;

use anyhow::{Context, Result};
use arcana_application::{AppContext, BootstrapOptions};
use arcana_core::horoscope::{Period, ZodiacSign};
use arcana_core::language::Language;
use arcana_core::wallet::PaymentMethod;
use arcana_infrastructure::ArcanaPaths;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod logging;
mod output;
mod prompt;

#[derive(Parser)]
#[command(name = "arcana")]
#[command(about = "Arcana - tarot chat and horoscopes in your terminal", long_about = None)]
struct Cli {
    /// Keep all local state in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the tarot reader (billed by session time)
    Chat {
        /// Continue a previous session
        #[arg(long, value_name = "SESSION_ID")]
        resume: Option<String>,
    },
    /// Log in with an email address or phone number
    Login {
        login: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Request and enter a verification code
    Verify { login: String },
    /// Reset a forgotten password
    Reset { login: String },
    /// Log out and forget the local account data
    Logout,
    /// Show the logged-in profile
    Whoami,
    /// Balance, recharges and payment history
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Saved chat sessions
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Show the horoscope of a zodiac sign
    Horoscope {
        sign: ZodiacSign,
        /// daily, weekly, monthly or yearly (repeatable)
        #[arg(long = "period", short = 'p')]
        periods: Vec<Period>,
    },
    /// Show your coins
    Points,
    /// Daily check-in
    CheckIn {
        /// Only show today's status
        #[arg(long)]
        status: bool,
    },
    /// The reader's personality
    Bot {
        #[command(subcommand)]
        action: BotAction,
    },
    /// Show or set the app language (en, zh)
    Language { code: Option<Language> },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Current balance
    Balance,
    /// Past recharges
    History,
    /// Start a recharge (wechat, alipay, paypal, stripe)
    Recharge {
        method: PaymentMethod,
        amount: Decimal,
    },
    /// Complete an approved PayPal order
    Capture { order_id: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List sessions, newest first
    List {
        /// Only titles containing this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print a session transcript
    Show { session_id: String },
    /// Delete a session
    Delete { session_id: String },
}

#[derive(Subcommand)]
enum BotAction {
    /// Show the current personality
    Show,
    /// Change the personality (the first one is free)
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        style: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %format!("{e:#}"), "command failed");
            output::alert(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = ArcanaPaths::resolve().context("Failed to locate the Arcana directories")?;
    let config = AppContext::load_config(&paths);
    let _guard = logging::init(&config.logging, &paths.logs_dir())?;

    let options = BootstrapOptions {
        ephemeral: cli.ephemeral,
    };
    let ctx = AppContext::bootstrap(&paths, config, options).await?;

    match cli.command {
        Commands::Chat { resume } => commands::chat::run(&ctx, resume.as_deref()).await?,
        Commands::Login { login, password } => commands::account::login(&ctx, &login, password).await?,
        Commands::Signup {
            name,
            email,
            password,
        } => commands::account::signup(&ctx, &name, &email, password).await?,
        Commands::Verify { login } => commands::account::verify(&ctx, &login).await?,
        Commands::Reset { login } => commands::account::reset(&ctx, &login).await?,
        Commands::Logout => commands::account::logout(&ctx).await?,
        Commands::Whoami => commands::account::whoami(&ctx).await?,
        Commands::Wallet { action } => match action {
            WalletAction::Balance => commands::wallet::balance(&ctx).await?,
            WalletAction::History => commands::wallet::history(&ctx).await?,
            WalletAction::Recharge { method, amount } => {
                commands::wallet::recharge(&ctx, &paths, method, amount).await?
            }
            WalletAction::Capture { order_id } => commands::wallet::capture(&ctx, &order_id).await?,
        },
        Commands::History { action } => match action {
            HistoryAction::List { filter } => commands::history::list(&ctx, filter.as_deref()).await?,
            HistoryAction::Show { session_id } => commands::history::show(&ctx, &session_id).await?,
            HistoryAction::Delete { session_id } => {
                commands::history::delete(&ctx, &session_id).await?
            }
        },
        Commands::Horoscope { sign, periods } => {
            commands::horoscope::show(&ctx, sign, &periods).await?
        }
        Commands::Points => commands::points::points(&ctx).await?,
        Commands::CheckIn { status } => commands::points::check_in(&ctx, status).await?,
        Commands::Bot { action } => match action {
            BotAction::Show => commands::bot::show(&ctx).await?,
            BotAction::Set { name, style } => commands::bot::set(&ctx, &name, &style).await?,
        },
        Commands::Language { code } => commands::language::run(&ctx, code).await?,
    }

    Ok(())
}
