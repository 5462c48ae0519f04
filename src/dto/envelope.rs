use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Standard response wrapper returned by every endpoint.
///
/// The payload travels under `datas` (occasionally `data`), next to an
/// optional human-readable `message` and an optional `warnings` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datas: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<Value>>,
}

impl ApiResponse {
    /// Payload field, preferring `datas` over the legacy `data` spelling.
    pub fn payload(&self) -> Option<&Value> {
        self.datas.as_ref().or(self.data.as_ref())
    }

    /// Server message, falling back to `default` when absent or blank.
    pub fn message_or(&self, default: &str) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => default.to_string(),
        }
    }

    /// Decode the payload into a typed value.
    ///
    /// A missing payload decodes as JSON `null`, which only succeeds for
    /// targets that accept it (e.g. `Option<T>`).
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T> {
        let payload = self.payload().cloned().unwrap_or(Value::Null);
        serde_json::from_value(payload).map_err(|e| Error::Api(format!("Invalid payload: {e}")))
    }
}
