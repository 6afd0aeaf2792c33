use serde_json::Value;

use crate::errors::{LetterboxdError, Result};
use crate::models::Envelope;

pub fn parse_envelope(body: &str) -> Result<Envelope> {
    let json = parse_json(body)?;
    Ok(interpret(&json))
}

pub(crate) fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|err| LetterboxdError::InvalidJson(err.to_string()))
}

pub fn interpret(json: &Value) -> Envelope {
    let message = json
        .get("messages")
        .and_then(Value::as_array)
        .map(|messages| messages.iter().filter_map(Value::as_str).collect::<String>())
        .unwrap_or_default();

    let success = match json.get("result") {
        Some(Value::String(result)) => result != "error",
        Some(Value::Bool(result)) => *result,
        _ => false,
    };

    Envelope { success, message }
}

pub fn csrf_token(json: &Value) -> Option<String> {
    json.get("csrf")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
