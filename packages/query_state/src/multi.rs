//! Synchronizes several query parameters at once.

use std::{collections::BTreeMap, sync::Arc};

use query_state_models::{HistoryMode, PartialQuery, RawQuery, RawValue};

use crate::{
    NavigationTarget, Navigator, QueryPatch, QueryProvider, QueryStatesOptions, SerializeFn,
    Serializer, SetOptions, Update,
};

/// A partial set of typed values, keyed by parameter name.
pub type PartialValues<T> = BTreeMap<String, T>;

/// Serializers of the parameters a multi-key synchronizer manages, in
/// declaration order.
///
/// Every value of a key map has the same type `T`. Parameters of different
/// types share one enum, with one variant per kind of value:
///
/// ```rust
/// use query_state::{KeyMap, RawQuery, RawValue, Serializer};
///
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// enum Filter {
///     Page(u32),
///     Search(Option<String>),
/// }
///
/// let keys = KeyMap::new()
///     .with_key(
///         "page",
///         Serializer::new(
///             |raw| {
///                 let page = raw.and_then(|x| x.first()).and_then(|x| x.parse().ok());
///                 Filter::Page(page.unwrap_or(1))
///             },
///             |value: &Filter| match value {
///                 Filter::Page(page) => Some(RawValue::from(page.to_string())),
///                 Filter::Search(_) => None,
///             },
///         ),
///     )
///     .with_key(
///         "q",
///         Serializer::new(
///             |raw| Filter::Search(raw.and_then(|x| x.first()).map(ToString::to_string)),
///             |value: &Filter| match value {
///                 Filter::Search(search) => search.as_deref().map(RawValue::from),
///                 Filter::Page(_) => None,
///             },
///         ),
///     );
///
/// let values = keys.parse(&RawQuery::parse("page=3&q=rust"));
/// assert_eq!(values.get("page"), Some(&Filter::Page(3)));
/// assert_eq!(values.get("q"), Some(&Filter::Search(Some("rust".to_string()))));
/// ```
pub struct KeyMap<T> {
    entries: Vec<(String, Serializer<T>)>,
    fallback: Option<SerializeFn<T>>,
}

impl<T> Default for KeyMap<T> {
    fn default() -> Self {
        Self {
            entries: vec![],
            fallback: None,
        }
    }
}

impl<T> Clone for KeyMap<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T> std::fmt::Debug for KeyMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMap")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<T> KeyMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key`. Re-adding a key replaces its serializer and keeps its
    /// position.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>, serializer: Serializer<T>) -> Self {
        self.insert(key, serializer);
        self
    }

    /// Sets the serializer used for updated keys that aren't in the map.
    #[must_use]
    pub fn with_fallback(
        mut self,
        serialize: impl Fn(&T) -> Option<RawValue> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Arc::new(serialize));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, serializer: Serializer<T>) {
        let key = key.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(x, _)| *x == key) {
            *existing = serializer;
        } else {
            self.entries.push((key, serializer));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Serializer<T>> {
        self.entries
            .iter()
            .find_map(|(x, serializer)| (x == key).then_some(serializer))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses every key of the map from `query`.
    #[must_use]
    pub fn parse(&self, query: &RawQuery) -> QueryValues<T> {
        QueryValues(
            self.entries
                .iter()
                .map(|(key, serializer)| (key.clone(), serializer.parse(query.get(key))))
                .collect(),
        )
    }

    /// Serializes `values` into a partial query.
    ///
    /// Values that serialize to nothing are left out, as are keys that are
    /// neither in the map nor covered by a fallback.
    #[must_use]
    pub fn serialize(&self, values: PartialValues<T>) -> PartialQuery {
        values
            .into_iter()
            .filter_map(|(key, value)| {
                let serialize = self
                    .get(&key)
                    .map(Serializer::serialize_fn)
                    .or(self.fallback.as_ref());

                let Some(serialize) = serialize else {
                    log::warn!("serialize: no serializer for key={key}, skipping");
                    return None;
                };

                serialize(&value).map(|raw| (key, Some(raw)))
            })
            .collect()
    }
}

impl KeyMap<Option<RawValue>> {
    /// A key map that falls back to the raw passthrough serializer.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            entries: vec![],
            fallback: Some(Serializer::raw().serialize_fn().clone()),
        }
    }

    /// Adds `key` with the raw passthrough serializer.
    #[must_use]
    pub fn with_raw_key(self, key: impl Into<String>) -> Self {
        self.with_key(key, Serializer::raw())
    }

    /// Adds `key` with its own `parse` and the raw passthrough `serialize`.
    #[must_use]
    pub fn with_parse_key(
        self,
        key: impl Into<String>,
        parse: impl Fn(Option<&RawValue>) -> Option<RawValue> + Send + Sync + 'static,
    ) -> Self {
        let serialize = Serializer::raw().serialize_fn().clone();
        self.with_key(key, Serializer::from_fns(Arc::new(parse), serialize))
    }
}

/// Parsed values of a [`KeyMap`], in key map order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryValues<T>(Vec<(String, T)>);

impl<T> QueryValues<T> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0
            .iter()
            .find_map(|(x, value)| (x == key).then_some(value))
    }

    /// Removes and returns the value of `key`.
    pub fn take(&mut self, key: &str) -> Option<T> {
        let index = self.0.iter().position(|(x, _)| x == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> IntoIterator for QueryValues<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> From<QueryValues<T>> for PartialValues<T> {
    fn from(value: QueryValues<T>) -> Self {
        value.0.into_iter().collect()
    }
}

/// Binds every key of `key_map` to a typed value.
///
/// Values are parsed on every call. Keys may differ between calls.
pub fn use_query_states<T, P, N>(
    key_map: KeyMap<T>,
    provider: &P,
    navigator: &N,
    options: QueryStatesOptions,
) -> (QueryValues<T>, QueryStatesSetter<T, N>)
where
    P: QueryProvider + ?Sized,
    N: Navigator + Clone,
{
    let values = key_map.parse(&provider.query());

    let setter = QueryStatesSetter {
        key_map: Arc::new(key_map),
        history: options.history,
        navigator: navigator.clone(),
    };

    (values, setter)
}

/// Writes several query parameters in one navigation.
pub struct QueryStatesSetter<T, N> {
    key_map: Arc<KeyMap<T>>,
    history: Option<HistoryMode>,
    navigator: N,
}

impl<T, N: Clone> Clone for QueryStatesSetter<T, N> {
    fn clone(&self) -> Self {
        Self {
            key_map: self.key_map.clone(),
            history: self.history,
            navigator: self.navigator.clone(),
        }
    }
}

impl<T, N> std::fmt::Debug for QueryStatesSetter<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStatesSetter")
            .field("key_map", &self.key_map)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, N: Navigator> QueryStatesSetter<T, N> {
    /// Submits `update` to the navigator.
    ///
    /// A partial mapping is serialized and sent as a partial patch. A
    /// function is sent as a patch function that parses every key from the
    /// query it is applied to and merges the serialized result into it.
    /// Values that serialize to nothing leave their key untouched in both
    /// cases.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn dispatch(
        &self,
        update: Update<QueryValues<T>, PartialValues<T>>,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        let mode = HistoryMode::resolve(options.history, self.history);

        let patch = match update {
            Update::Value(values) => QueryPatch::Partial(self.key_map.serialize(values)),
            Update::Function(f) => {
                let key_map = self.key_map.clone();

                QueryPatch::function(move |query| {
                    let prev = key_map.parse(query);
                    query.clone().merged(key_map.serialize(f(prev)))
                })
            }
        };

        log::debug!("dispatch: mode={mode} patch={patch:?}");

        self.navigator
            .navigate(mode, NavigationTarget::new(patch), transition)
    }

    /// Sets the given values with default options.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn set(&self, values: PartialValues<T>) -> Result<(), N::Error> {
        self.dispatch(
            Update::Value(values),
            SetOptions::default(),
            N::Transition::default(),
        )
    }

    /// Sets the given values.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn set_with(
        &self,
        values: PartialValues<T>,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        self.dispatch(Update::Value(values), options, transition)
    }

    /// Computes values from the previous ones with default options.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn update(
        &self,
        f: impl FnOnce(QueryValues<T>) -> PartialValues<T> + Send + 'static,
    ) -> Result<(), N::Error> {
        self.dispatch(
            Update::function(f),
            SetOptions::default(),
            N::Transition::default(),
        )
    }

    /// Computes values from the previous ones.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn update_with(
        &self,
        f: impl FnOnce(QueryValues<T>) -> PartialValues<T> + Send + 'static,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        self.dispatch(Update::function(f), options, transition)
    }
}
