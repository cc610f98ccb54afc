use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Status value the portal uses for a completed action.
pub const SUCCESS_STATUS: &str = "success";

/// Body of `POST /api/add_slot`, taken verbatim from the form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCreationRequest {
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub notes: String,
}

/// A booking is identified only by the slot id; it travels in the URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub slot_id: String,
}

impl BookingRequest {
    pub fn new(slot_id: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
        }
    }
}

/// Reply shared by both portal endpoints. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PortalResponse {
    /// Decode a reply body. Anything other than a JSON object whose `status`
    /// and `message` are strings (or absent) is malformed.
    pub fn from_body(body: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| BridgeError::MalformedResponse(e.to_string()))?;

        if !value.is_object() {
            return Err(BridgeError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value).map_err(|e| BridgeError::MalformedResponse(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// Message to show the user; empty when the portal sent none.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
