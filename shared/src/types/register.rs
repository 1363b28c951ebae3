use serde::{Deserialize, Serialize};

/// Banner shown on the login page after a successful signup.
pub const SIGNUP_SUCCESS_MESSAGE: &str =
    "Registration successful!\nCheck your email to activate your account.";

/// Banner shown on the signup page when the server answers 409.
pub const SIGNUP_CONFLICT_MESSAGE: &str =
    "An account with the same email or username already exists.";

/// Body of `POST /api/auth/signup`.
///
/// `hash` carries the plain password; the server hashes it before storing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub hash: String,
}

impl RegistrationData {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.username.trim().is_empty() {
            return Err(RegistrationError::MissingField("username".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(RegistrationError::MissingField("email".to_string()));
        }
        if !self.email.contains('@') {
            return Err(RegistrationError::InvalidEmail);
        }
        if self.hash.is_empty() {
            return Err(RegistrationError::MissingField("password".to_string()));
        }
        Ok(())
    }
}

/// Error codes for registration
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationError {
    AccountExists,
    InvalidEmail,
    MissingField(String),
    Rejected(String),
}

impl RegistrationError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Rejected(_) => "REJECTED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::AccountExists => SIGNUP_CONFLICT_MESSAGE.to_string(),
            Self::InvalidEmail => "Invalid email format".to_string(),
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::Rejected(detail) => detail.clone(),
        }
    }
}
