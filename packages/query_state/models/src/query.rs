use std::{collections::BTreeMap, fmt::Display};

use qstring::QString;

use crate::RawValue;

/// A partial query patch.
///
/// Keys mapped to `None` carry no value and are dropped from the query the
/// patch is merged into.
pub type PartialQuery = BTreeMap<String, Option<RawValue>>;

/// The query parameters of the current route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RawQuery(BTreeMap<String, RawValue>);

impl RawQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parses a URL query string.
    ///
    /// A leading `?` is ignored and keys and values are percent-decoded.
    /// Repeated keys are collected, in order, into a [`RawValue::Multiple`].
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params: BTreeMap<String, RawValue> = BTreeMap::new();

        for (key, value) in QString::from(query).into_pairs() {
            if let Some(existing) = params.get_mut(&key) {
                existing.push(value);
            } else {
                params.insert(key, RawValue::Single(value));
            }
        }

        log::trace!("parse: query={query:?} params={params:?}");

        Self(params)
    }

    /// Builder-style [`RawQuery::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> Option<RawValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow-merges `patch` into this query.
    ///
    /// Keys present in the patch overwrite existing keys, `None` entries
    /// remove them and every other key is kept as is.
    pub fn merge(&mut self, patch: PartialQuery) {
        for (key, value) in patch {
            match value {
                Some(value) => {
                    self.0.insert(key, value);
                }
                None => {
                    self.0.remove(&key);
                }
            }
        }
    }

    /// Owned variant of [`RawQuery::merge`].
    #[must_use]
    pub fn merged(mut self, patch: PartialQuery) -> Self {
        self.merge(patch);
        self
    }

    /// Formats the query as a URL query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let pairs = self
            .0
            .iter()
            .flat_map(|(key, value)| {
                value
                    .as_slice()
                    .iter()
                    .map(move |value| (key.as_str(), value.as_str()))
            })
            .collect::<Vec<_>>();

        QString::new(pairs).to_string()
    }
}

impl Display for RawQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl From<BTreeMap<String, RawValue>> for RawQuery {
    fn from(value: BTreeMap<String, RawValue>) -> Self {
        Self(value)
    }
}

impl From<RawQuery> for BTreeMap<String, RawValue> {
    fn from(value: RawQuery) -> Self {
        value.0
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for RawQuery {
    type Item = (String, RawValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RawQuery {
    type Item = (&'a String, &'a RawValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn parse_single_values() {
        let query = RawQuery::parse("a=1&b=two");
        assert_eq!(query.get("a"), Some(&RawValue::from("1")));
        assert_eq!(query.get("b"), Some(&RawValue::from("two")));
        assert_eq!(query.len(), 2);
    }

    #[test_log::test]
    fn parse_ignores_leading_question_mark() {
        assert_eq!(RawQuery::parse("?val=123"), RawQuery::new().with("val", "123"));
    }

    #[test_log::test]
    fn parse_collects_repeated_keys_in_order() {
        let query = RawQuery::parse("tag=x&other=1&tag=y&tag=z");
        assert_eq!(query.get("tag"), Some(&RawValue::from(vec!["x", "y", "z"])));
        assert_eq!(query.get("other"), Some(&RawValue::from("1")));
    }

    #[test_log::test]
    fn parse_decodes_percent_encoding() {
        let query = RawQuery::parse("q=hello%20world");
        assert_eq!(query.get("q"), Some(&RawValue::from("hello world")));
    }

    #[test_log::test]
    fn parse_empty_string_is_empty() {
        assert!(RawQuery::parse("").is_empty());
    }

    #[test_log::test]
    fn to_query_string_repeats_multiple_values() {
        let query = RawQuery::new()
            .with("a", "1")
            .with("tag", vec!["x", "y"]);
        assert_eq!(query.to_query_string(), "a=1&tag=x&tag=y");
        assert_eq!(query.to_string(), "a=1&tag=x&tag=y");
    }

    #[test_log::test]
    fn to_query_string_of_empty_query_is_empty() {
        assert_eq!(RawQuery::new().to_query_string(), "");
    }

    #[test_log::test]
    fn merge_overwrites_and_keeps_other_keys() {
        let query = RawQuery::new().with("a", "1").with("b", "2");
        let patch = PartialQuery::from([
            ("a".to_string(), Some(RawValue::from("10"))),
            ("c".to_string(), Some(RawValue::from("3"))),
        ]);

        assert_eq!(
            query.merged(patch),
            RawQuery::new().with("a", "10").with("b", "2").with("c", "3")
        );
    }

    #[test_log::test]
    fn merge_removes_keys_without_value() {
        let query = RawQuery::new().with("a", "1").with("b", "2");
        let patch = PartialQuery::from([("a".to_string(), None)]);

        assert_eq!(query.merged(patch), RawQuery::new().with("b", "2"));
    }

    #[cfg(feature = "serde")]
    #[test_log::test]
    fn serde_is_a_plain_object() {
        let query = RawQuery::new().with("a", "1").with("t", vec!["x", "y"]);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "1", "t": ["x", "y"] }));

        let back: RawQuery = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }
}
