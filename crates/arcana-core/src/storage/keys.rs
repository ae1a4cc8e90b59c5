//! Well-known storage keys.

pub const AUTH_TOKEN: &str = "@auth_token";
pub const USER_ID: &str = "@user_id";
pub const USER_NAME: &str = "@user_name";
pub const USER_EMAIL: &str = "@user_email";
pub const USER_PROFILE: &str = "@user_profile";
pub const FIRST_LOGIN: &str = "@first_login";

pub const WALLET_BALANCE: &str = "@wallet_balance";
pub const WALLET_HISTORY: &str = "@wallet_history";
pub const LAST_ORDER_AMOUNT: &str = "@last_order_amount";

pub const CHAT_SESSIONS: &str = "@chat_sessions";
pub const CURRENT_SESSION: &str = "@current_session";
pub const SESSION_ELAPSED_SECONDS: &str = "@session_elapsed_seconds";
pub const HAS_USED_FREE_SESSION: &str = "@has_used_free_session";

pub const TAROT_BOT: &str = "@tarot_bot";
pub const APP_LANGUAGE: &str = "@app_language";
pub const APP_THEME: &str = "@app_theme";

/// Prefix shared by every per-session transcript key.
pub const TRANSCRIPT_PREFIX: &str = "session_";

/// Storage key of the transcript for `session_id`.
pub fn transcript_key(session_id: &str) -> String {
    format!("{TRANSCRIPT_PREFIX}{session_id}")
}

/// Keys written by a successful login and cleared by logout.
pub const AUTH_KEYS: &[&str] = &[
    AUTH_TOKEN,
    USER_ID,
    USER_NAME,
    USER_EMAIL,
    USER_PROFILE,
    WALLET_BALANCE,
];
