use serde::{Deserialize, Serialize};

use crate::types::photo::UploadError;

/// User profile as returned by `/api/users/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl User {
    pub fn is_moderator(&self) -> bool {
        matches!(self.role.as_str(), "admin" | "moderator")
    }
}

/// File for `PATCH /api/users/me/avatar`.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub file: Vec<u8>,
}

impl AvatarUpload {
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.file.is_empty() {
            return Err(UploadError::MissingFile);
        }
        Ok(())
    }
}
