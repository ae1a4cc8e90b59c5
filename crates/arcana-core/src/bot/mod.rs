//! Tarot bot domain module.
//!
//! # Module Structure
//!
//! - `persona`: user-defined bot personality (`BotPersonality`)
//! - `prompt`: system prompt rendering
//! - `client`: the remote bot (`TarotBot`, `BotRequest`, `BotResponse`)

mod client;
mod persona;
mod prompt;

pub use client::{BotRequest, BotResponse, TarotBot};
pub use persona::BotPersonality;
pub use prompt::{DEFAULT_BOT_NAME, system_prompt};
