//! Safe traversal and coercion over loosely typed JSON.
//!
//! AI output rarely matches the requested schema exactly: keys go missing,
//! numbers arrive as strings, and lists arrive as scalars. [`Lookup`] wraps an
//! optional [`Value`] so that every path step and every conversion degrades to
//! the type's empty value instead of failing.

use serde_json::Value;

/// Delimiter used when a list is stored as a single string.
pub const LIST_DELIMITER: &str = ", ";

/// A cursor into a JSON document that may point at nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lookup<'a>(Option<&'a Value>);

impl<'a> Lookup<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    /// Step into an object member. Non-objects and absent keys yield a missing cursor.
    pub fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|v| v.as_object()).and_then(|m| m.get(key)))
    }

    /// Follow a sequence of object keys.
    pub fn path(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |cursor, key| cursor.get(key))
    }

    /// Return the first path that resolves to a present value.
    pub fn first_present<'p, I>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = &'p [&'p str]>,
    {
        paths
            .into_iter()
            .map(|p| self.path(p))
            .find(|cursor| cursor.is_present())
            .unwrap_or_default()
    }

    /// A value is present unless it is absent, `null`, or a blank string.
    pub fn is_present(self) -> bool {
        match self.0 {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn is_object(self) -> bool {
        matches!(self.0, Some(Value::Object(_)))
    }

    /// Elements of an array; anything else has no elements.
    pub fn items(self) -> impl Iterator<Item = Lookup<'a>> {
        self.0
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
            .map(Lookup::new)
    }

    pub fn text(self) -> String {
        self.0.map(coerce_text).unwrap_or_default()
    }

    pub fn count(self) -> i32 {
        self.0.map(coerce_count).unwrap_or(0)
    }

    /// Join an array into one delimited string. A scalar is kept as its text.
    pub fn joined(self) -> String {
        match self.0 {
            Some(Value::Array(items)) => join_list(items),
            Some(other) => coerce_text(other),
            None => String::new(),
        }
    }
}

/// Render a scalar as text. Containers and `null` become the empty string.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerce a value into a non-negative integer.
///
/// Integers pass through, floats and float strings are truncated, and anything
/// unparseable is 0. Negative results are clamped to 0.
pub fn coerce_count(value: &Value) -> i32 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_count(s),
        _ => None,
    };
    raw.map(clamp_count).unwrap_or(0)
}

fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

fn clamp_count(n: i64) -> i32 {
    n.clamp(0, i64::from(i32::MAX)) as i32
}

/// Join list items with [`LIST_DELIMITER`], skipping items with no text.
pub fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .map(coerce_text)
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}

/// Split a delimited string back into a list.
///
/// This is the inverse of [`join_list`] only when no item contains the
/// delimiter itself.
pub fn split_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(LIST_DELIMITER).map(str::to_string).collect()
}
