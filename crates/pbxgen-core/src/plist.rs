//! Value tree and string encoding for the OpenStep ASCII property-list dialect
//! that `project.pbxproj` files are written in.

use pbxgen_schema::{ObjectId, SettingValue};
use std::borrow::Cow;

/// A property-list value as it appears in an object's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    /// Reference to another object; rendered with that object's comment.
    Ref(ObjectId),
    Array(Vec<Value>),
    Dict(Vec<(String, Value)>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn int(n: u64) -> Self {
        Value::Str(n.to_string())
    }

    pub fn refs<'a>(ids: impl IntoIterator<Item = &'a ObjectId>) -> Self {
        Value::Array(ids.into_iter().cloned().map(Value::Ref).collect())
    }

    pub fn empty_array() -> Self {
        Value::Array(Vec::new())
    }
}

impl From<&SettingValue> for Value {
    fn from(v: &SettingValue) -> Self {
        match v {
            SettingValue::Text(s) => Value::Str(s.clone()),
            SettingValue::List(items) => Value::Array(items.iter().cloned().map(Value::Str).collect()),
        }
    }
}

fn is_bare_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'/')
}

/// Encode a string literal: bare when it is made only of safe characters,
/// otherwise double-quoted with escapes.
pub fn encode_string(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && s.bytes().all(is_bare_byte) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Text safe to place inside a `/* ... */` annotation.
pub fn encode_comment(s: &str) -> Cow<'_, str> {
    if s.contains("*/") {
        Cow::Owned(s.replace("*/", "* /"))
    } else {
        Cow::Borrowed(s)
    }
}
