//! Parameter access
//!
//! [`ParameterBag`] reads parameters for item 0 of the current invocation and
//! knows which operation it serves, so a missing required value names both.
//! "Truthy" follows the host's scripting rules: `false`, `0`, `""` and `null`
//! are falsy, every other value (including empty lists and objects) is truthy.

use crate::error::{Error, Result};
use crate::node::host::ParameterSource;
use crate::node::registry::OperationKey;
use serde_json::{Map, Value};

/// The only item index this node reads
pub const ITEM_INDEX: usize = 0;

/// Host truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parameters of one invocation
pub struct ParameterBag<'a> {
    source: &'a dyn ParameterSource,
    key: OperationKey,
}

impl<'a> ParameterBag<'a> {
    pub fn new(source: &'a dyn ParameterSource, key: OperationKey) -> Self {
        Self { source, key }
    }

    pub fn key(&self) -> OperationKey {
        self.key
    }

    /// Raw value, `null` treated as absent
    pub fn value(&self, name: &str) -> Option<Value> {
        self.source
            .get_parameter(name, ITEM_INDEX)
            .filter(|v| !v.is_null())
    }

    pub fn value_or(&self, name: &str, default: Value) -> Value {
        self.value(name).unwrap_or(default)
    }

    /// Scalar parameter rendered as a string
    pub fn string(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn string_or(&self, name: &str, default: &str) -> String {
        self.string(name).unwrap_or_else(|| default.to_string())
    }

    /// Non-empty string parameter, or [`Error::MissingParameter`]
    pub fn required_str(&self, name: &str) -> Result<String> {
        match self.string(name) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(Error::MissingParameter {
                key: self.key,
                name: name.to_string(),
            }),
        }
    }

    /// Boolean parameter; non-boolean values use truthiness
    pub fn flag(&self, name: &str) -> bool {
        self.value(name).as_ref().is_some_and(is_truthy)
    }

    /// Value only when truthy
    pub fn truthy(&self, name: &str) -> Option<Value> {
        self.value(name).filter(is_truthy)
    }

    /// String form of a truthy scalar
    pub fn truthy_string(&self, name: &str) -> Option<String> {
        match self.truthy(name)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Entries of a repeatable collection parameter.
    ///
    /// Accepts a plain list or the host's fixed-collection wrapper, an object
    /// holding the list under a single key. Anything else is empty, as are
    /// non-object entries.
    pub fn collection(&self, name: &str) -> Vec<Map<String, Value>> {
        let list = match self.value(name) {
            Some(Value::Array(items)) => items,
            Some(Value::Object(wrapper)) if wrapper.len() == 1 => {
                match wrapper.into_iter().next() {
                    Some((_, Value::Array(items))) => items,
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        };

        list.into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }
}

/// Copy each named field into `body` when its value is truthy.
///
/// Body keys are the parameter names. Falsy fields are left out entirely.
pub fn include_if_truthy(body: &mut Map<String, Value>, params: &ParameterBag<'_>, fields: &[&str]) {
    for field in fields {
        if let Some(value) = params.truthy(field) {
            body.insert((*field).to_string(), value);
        }
    }
}

/// String values of `member` across collection entries, in order
pub fn project_member(entries: &[Map<String, Value>], member: &str) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| entry.get(member))
        .filter(|v| v.is_string())
        .cloned()
        .collect()
}
