//! Session domain module.
//!
//! # Module Structure
//!
//! - `clock`: elapsed-seconds counter (`SessionClock`)
//! - `message`: transcript message types (`ChatMessage`, `Sender`, `MessageBody`)
//! - `meta`: history index entries (`ChatSessionMeta`)
//! - `transcript`: append-only message log (`ChatTranscript`)
//! - `repository`: persistence trait for transcripts and the history index

mod clock;
mod message;
mod meta;
mod repository;
mod transcript;

// Re-export public API
pub use clock::{ClockReset, SessionClock, TickOutcome};
pub use message::{CardFace, ChatMessage, MessageBody, Sender};
pub use meta::{ChatSessionMeta, TITLE_MAX_CHARS, UNTITLED, derive_title};
pub use repository::TranscriptRepository;
pub use transcript::{ChatTranscript, delete_session};

/// Generates a new time-based session id (`s_<unix millis>`).
pub fn new_session_id() -> String {
    format!("s_{}", chrono::Utc::now().timestamp_millis())
}
