use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Login form fields. The backend reads them as an OAuth2 password form, so
/// they go out URL-encoded rather than as JSON.
#[derive(Debug, Clone)]
pub struct LoginData {
    /// The backend looks accounts up by email; the form field is still
    /// called `username`.
    pub username: String,
    pub password: String,
}

impl LoginData {
    /// `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .finish()
    }

    pub fn validate(&self) -> Result<(), LoginError> {
        if self.username.trim().is_empty() {
            return Err(LoginError::MissingField("username".to_string()));
        }
        if self.password.is_empty() {
            return Err(LoginError::MissingField("password".to_string()));
        }
        Ok(())
    }
}

/// Successful login / refresh response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// ---------------------------------------------------------------------------
// Login errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LoginError {
    MissingField(String),
    /// The server refused the credentials; carries its `detail` text.
    Rejected(String),
    InternalError,
}

impl LoginError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Rejected(_) => "REJECTED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::Rejected(detail) => detail.clone(),
            Self::InternalError => "An internal error occurred".to_string(),
        }
    }
}
