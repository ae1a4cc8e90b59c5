use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::{MIN_PASSWORD_LEN, is_valid_email, is_valid_phone};
use crate::error::{ArcanaError, Result};

/// An account identifier typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginId {
    Email(String),
    Phone(String),
}

impl LoginId {
    /// Classifies raw input as a phone number or an email address.
    ///
    /// Emails are lower-cased. Anything matching neither pattern is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ArcanaError::validation("Please enter your email or phone"));
        }
        if is_valid_phone(trimmed) {
            Ok(Self::Phone(trimmed.to_string()))
        } else if is_valid_email(trimmed) {
            Ok(Self::Email(trimmed.to_lowercase()))
        } else {
            Err(ArcanaError::validation("Invalid email or phone number"))
        }
    }

    /// JSON field name the backend expects for this identifier.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Email(v) | Self::Phone(v) => v,
        }
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: LoginId,
    pub password: String,
}

impl Credentials {
    pub fn new(login: &str, password: &str) -> Result<Self> {
        if login.trim().is_empty() || password.is_empty() {
            return Err(ArcanaError::validation("Please enter email and password."));
        }
        Ok(Self {
            login: LoginId::parse(login)?,
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ArcanaError::validation("Please fill in all fields"));
        }
        if !is_valid_email(email.trim()) {
            return Err(ArcanaError::validation("Invalid email address"));
        }
        Ok(Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        })
    }
}

/// Returned by a password reset request; carries the token to confirm with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    pub login: LoginId,
    pub token: String,
}

impl ResetTicket {
    /// Checks a new password before it is sent with this ticket.
    pub fn validate_new_password(code: &str, password: &str) -> Result<()> {
        if code.trim().is_empty() || password.trim().is_empty() {
            return Err(ArcanaError::validation("Please enter the code and a new password"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ArcanaError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(alias = "_id", alias = "userId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// Successful login: bearer token, profile and the balance reported with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
    pub balance: Decimal,
}

/// Partial profile edit; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub profile_pic: Option<String>,
    pub points: Option<i64>,
}

impl AuthUser {
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(pic) = &update.profile_pic {
            self.profile_pic = Some(pic.clone());
        }
        if let Some(points) = update.points {
            self.points = points;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_classification() {
        assert_eq!(
            LoginId::parse(" Luna@Tarot.App ").unwrap(),
            LoginId::Email("luna@tarot.app".to_string())
        );
        assert_eq!(
            LoginId::parse("13800138000").unwrap().field(),
            "phone"
        );
        assert!(LoginId::parse("not an id").unwrap_err().is_validation());
        assert!(LoginId::parse("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_credentials_require_both_fields() {
        assert!(Credentials::new("luna@tarot.app", "").is_err());
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("luna@tarot.app", "secret").is_ok());
    }

    #[test]
    fn test_signup_validation() {
        assert!(SignupRequest::new("Luna", "luna@tarot.app", "pw").is_ok());
        assert!(SignupRequest::new(" ", "luna@tarot.app", "pw").is_err());
        assert!(SignupRequest::new("Luna", "luna", "pw").is_err());
    }

    #[test]
    fn test_new_password_rules() {
        assert!(ResetTicket::validate_new_password("1234", "abcdef").is_ok());
        assert!(ResetTicket::validate_new_password("1234", "abc").is_err());
        assert!(ResetTicket::validate_new_password("", "abcdef").is_err());
    }

    #[test]
    fn test_user_accepts_backend_id_field() {
        let user: AuthUser = serde_json::from_str(
            r#"{"_id":"u_9","name":"Luna","email":"luna@tarot.app","points":12,"referralCode":"LUNA1"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u_9");
        assert_eq!(user.points, 12);
        assert_eq!(user.referral_code.as_deref(), Some("LUNA1"));
    }

    #[test]
    fn test_profile_update_applies_present_fields() {
        let mut user = AuthUser {
            id: "u".to_string(),
            name: "Old".to_string(),
            points: 3,
            ..Default::default()
        };
        user.apply(&ProfileUpdate {
            name: Some("New".to_string()),
            ..Default::default()
        });
        assert_eq!(user.name, "New");
        assert_eq!(user.points, 3);
    }
}
