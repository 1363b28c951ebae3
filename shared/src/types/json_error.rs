use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body sent by the API.
///
/// Most failures carry `{"detail": "..."}`; validation failures carry a list
/// of `{"msg": ...}` objects under `detail`; a few endpoints use `message`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Parse a raw response body. Returns `None` for bodies that are not a
    /// JSON object.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The user-facing text: `detail` when it is a string, the joined `msg`
    /// entries when it is a validation list, otherwise `message`.
    pub fn user_message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
            Some(Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
        self.message.clone().filter(|m| !m.is_empty())
    }
}
