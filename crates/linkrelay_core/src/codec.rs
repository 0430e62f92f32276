//! JSON method codec for the runtime message channel.
//!
//! Frame layout:
//!
//! - method call: `{"method": "<verb>", "args": <json>}`
//! - success envelope: `[<result>]`
//! - error envelope: `[<code>, <message>, <details>]`
//! - not implemented: empty reply

use serde_json::{json, Value};

use crate::channel::{MethodCall, MethodResponse};
use crate::error::{RelayError, Result};

/// Encodes method calls and reply envelopes as UTF-8 JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMethodCodec;

impl JsonMethodCodec {
    pub fn encode_method_call(&self, call: &MethodCall) -> Result<Vec<u8>> {
        let frame = json!({ "method": call.method, "args": call.args });
        Ok(serde_json::to_vec(&frame)?)
    }

    pub fn decode_method_call(&self, bytes: &[u8]) -> Result<MethodCall> {
        let frame: Value = serde_json::from_slice(bytes)?;
        let Value::Object(mut map) = frame else {
            return Err(RelayError::Codec(
                "method call frame is not a JSON object".to_string(),
            ));
        };

        let method = match map.remove("method") {
            Some(Value::String(method)) => method,
            Some(_) => {
                return Err(RelayError::Codec(
                    "method call 'method' is not a string".to_string(),
                ))
            }
            None => {
                return Err(RelayError::Codec(
                    "method call frame has no 'method'".to_string(),
                ))
            }
        };
        let args = map.remove("args").unwrap_or(Value::Null);

        Ok(MethodCall { method, args })
    }

    /// Encode a reply. `NotImplemented` becomes the empty reply.
    pub fn encode_envelope(&self, response: &MethodResponse) -> Result<Vec<u8>> {
        let envelope = match response {
            MethodResponse::Success(result) => json!([result]),
            MethodResponse::Error {
                code,
                message,
                details,
            } => json!([code, message, details]),
            MethodResponse::NotImplemented => return Ok(Vec::new()),
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    pub fn decode_envelope(&self, bytes: &[u8]) -> Result<MethodResponse> {
        if bytes.is_empty() {
            return Ok(MethodResponse::NotImplemented);
        }

        let envelope: Value = serde_json::from_slice(bytes)?;
        let Value::Array(mut items) = envelope else {
            return Err(RelayError::Codec("envelope is not a JSON array".to_string()));
        };

        match items.len() {
            1 => Ok(MethodResponse::Success(items.remove(0))),
            3 => {
                let details = items.pop().unwrap_or(Value::Null);
                let message = match items.pop() {
                    Some(Value::String(message)) => Some(message),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };
                let code = match items.pop() {
                    Some(Value::String(code)) => code,
                    _ => {
                        return Err(RelayError::Codec(
                            "error envelope code is not a string".to_string(),
                        ))
                    }
                };
                Ok(MethodResponse::Error {
                    code,
                    message,
                    details,
                })
            }
            n => Err(RelayError::Codec(format!(
                "envelope has {n} elements, expected 1 or 3"
            ))),
        }
    }
}
