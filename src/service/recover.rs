//! Recovery of the one JSON object a generated answer is supposed to contain.
//!
//! Models wrap their JSON in prose or code fences, so recovery is two
//! stages: locate a candidate span, then parse it.

use serde_json::{Map, Value};

/// Outcome of pulling an object out of free text.
#[derive(Debug)]
pub enum Recovery {
    Parsed(Map<String, Value>),
    /// No `{` … `}` span in the text.
    NoCandidate,
    /// A span was found but is not a JSON object.
    Malformed(serde_json::Error),
}

/// The span from the first `{` to the last `}`, if they come in that order.
pub fn locate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_object(candidate: &str) -> Recovery {
    match serde_json::from_str::<Map<String, Value>>(candidate) {
        Ok(map) => Recovery::Parsed(map),
        Err(e) => Recovery::Malformed(e),
    }
}

pub fn recover(text: &str) -> Recovery {
    match locate_object(text) {
        Some(candidate) => parse_object(candidate),
        None => Recovery::NoCandidate,
    }
}

/// Text of a recovered field. Missing, `null`, `false`, `0` and empty
/// containers read as empty; `true` reads as `True` and other scalars are
/// rendered as text.
pub fn field_text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(a)) if a.is_empty() => String::new(),
        Some(Value::Object(o)) if o.is_empty() => String::new(),
        Some(other) => other.to_string(),
    }
}
