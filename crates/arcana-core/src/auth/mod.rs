//! Account domain module.
//!
//! # Module Structure
//!
//! - `model`: identifiers, credentials and the user profile
//! - `validation`: input checks run before any request is made
//! - `backend`: remote account endpoints (`AuthBackend`)

mod backend;
mod model;
mod validation;

pub use backend::AuthBackend;
pub use model::{AuthSession, AuthUser, Credentials, LoginId, ProfileUpdate, ResetTicket, SignupRequest};
pub use validation::{MIN_PASSWORD_LEN, is_valid_email, is_valid_phone};
