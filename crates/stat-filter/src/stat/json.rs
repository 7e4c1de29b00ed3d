//! A stat that reads a field out of a JSON record.

use serde_json::Value;

use super::{Stat, StatValue};

/// Reads a value from a `serde_json::Value` record by JSON pointer.
///
/// Numbers read as [`StatValue::Number`] and strings as [`StatValue::Text`].
/// Objects with a string `name` (and optionally a numeric `number`) read as
/// [`StatValue::Labeled`]. Anything else, including a missing field, reads
/// as `NaN`, which compares unequal to every value.
///
/// ```
/// use serde_json::json;
/// use stat_filter::stat::{JsonStat, Stat, StatValue};
///
/// let stat = JsonStat::new("auto", "AutoPoints", "/scores/auto");
/// let record = json!({"scores": {"auto": 12}});
/// assert_eq!(stat.read(&record), StatValue::Number(12.0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStat {
    identifier_name: String,
    api_field: String,
    pointer: String,
}

impl JsonStat {
    /// Creates a stat reading the value at `pointer`.
    ///
    /// A pointer without a leading `/` is treated as a top-level key.
    pub fn new(
        identifier_name: impl Into<String>,
        api_field: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        let pointer = pointer.into();
        let pointer = if pointer.is_empty() || pointer.starts_with('/') {
            pointer
        } else {
            format!("/{pointer}")
        };

        Self {
            identifier_name: identifier_name.into(),
            api_field: api_field.into(),
            pointer,
        }
    }

    /// Returns the JSON pointer this stat reads.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl Stat<Value> for JsonStat {
    fn identifier_name(&self) -> &str {
        &self.identifier_name
    }

    fn api_field(&self) -> &str {
        &self.api_field
    }

    fn read(&self, record: &Value) -> StatValue {
        match record.pointer(&self.pointer) {
            Some(Value::Number(n)) => StatValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Some(Value::String(s)) => StatValue::Text(s.clone()),
            Some(Value::Object(obj)) => match obj.get("name").and_then(Value::as_str) {
                Some(name) => StatValue::Labeled {
                    number: obj.get("number").and_then(Value::as_f64),
                    name: name.to_string(),
                },
                None => StatValue::Number(f64::NAN),
            },
            _ => StatValue::Number(f64::NAN),
        }
    }
}
