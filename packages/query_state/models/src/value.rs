use std::fmt::Display;

/// Separator used when a [`RawValue::Multiple`] is flattened into one string.
pub const DEFAULT_SEPARATOR: &str = ",";

/// A single query parameter as the router sees it.
///
/// A parameter that appears once in the URL is a [`RawValue::Single`], one
/// that is repeated (`?tag=a&tag=b`) is a [`RawValue::Multiple`]. An absent
/// parameter is represented by `None` at the lookup site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    Single(String),
    Multiple(Vec<String>),
}

impl RawValue {
    /// Flattens the value into one string, joining sequences with `separator`.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.join(separator),
        }
    }

    /// Returns the first string of the value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Returns all strings of the value in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// Appends another occurrence of the parameter, promoting a single value
    /// into a sequence.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self {
            Self::Single(existing) => {
                *self = Self::Multiple(vec![std::mem::take(existing), value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&String> for RawValue {
    fn from(value: &String) -> Self {
        Self::Single(value.clone())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        Self::Multiple(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Multiple(value.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[&str]> for RawValue {
    fn from(value: &[&str]) -> Self {
        Self::Multiple(value.iter().map(ToString::to_string).collect())
    }
}
