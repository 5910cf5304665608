//! Native engine events.
//!
//! The engine raises named events with a positional argument tuple. Values
//! are kept as JSON values so that the bridge can re-emit them untouched
//! under every alias.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional arguments carried by one event occurrence.
pub type EventArgs = Vec<Value>;

/// One event occurrence as raised by the native engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeEvent {
    /// Native event name, e.g. `"userjoined"`.
    pub name: String,

    /// Positional arguments.
    #[serde(default)]
    pub args: EventArgs,
}

impl NativeEvent {
    pub fn new(name: impl Into<String>, args: EventArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

}

/// Interpret an event argument as a participant uid.
///
/// Uids arrive either as JSON numbers or as decimal strings depending on
/// the engine build; both are accepted.
pub fn value_as_uid(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uid_accepts_numbers_and_strings() {
        assert_eq!(value_as_uid(&json!(9)), Some(9));
        assert_eq!(value_as_uid(&json!(" 42")), Some(42));
        assert_eq!(value_as_uid(&json!(-1)), None);
        assert_eq!(value_as_uid(&json!(null)), None);
    }

    #[test]
    fn uid_rejects_out_of_range() {
        assert_eq!(value_as_uid(&json!(u64::from(u32::MAX) + 1)), None);
    }

    #[test]
    fn args_default_to_empty() {
        let event: NativeEvent = serde_json::from_str(r#"{"name":"leavechannel"}"#).unwrap();
        assert!(event.args.is_empty());
    }
}
