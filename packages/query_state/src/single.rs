//! Synchronizes one query parameter with one typed value.

use query_state_models::{DEFAULT_SEPARATOR, HistoryMode, PartialQuery, RawValue};

use crate::{
    Dependency, Memo, NavigationTarget, Navigator, QueryPatch, QueryProvider, QueryStateOptions,
    Serializer, SetOptions, Update,
};

/// Per-component state of a single-key synchronizer.
///
/// Keep one instance alive across renders of the same component and pass it
/// to [`use_query_state`] on every render.
pub struct QueryState<T> {
    key: Option<String>,
    memo: Memo<T>,
    serializer: Option<Serializer<T>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            key: None,
            memo: Memo::default(),
            serializer: None,
        }
    }
}

impl<T: Clone + 'static> QueryState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current value of `key` and builds its setter.
    ///
    /// The value is only parsed again when the raw value of `key` changes,
    /// or, with [`QueryStateOptions::dynamic`], when `serializer` holds
    /// different functions than on the previous render. Without `dynamic`
    /// the serializer of the first render stays in use.
    ///
    /// `key` is expected to stay the same across renders. If it changes, the
    /// cached value is dropped and parsed again for the new key.
    pub fn render<P: QueryProvider + ?Sized, N: Navigator + Clone>(
        &mut self,
        key: &str,
        provider: &P,
        navigator: &N,
        serializer: Serializer<T>,
        options: QueryStateOptions,
    ) -> (T, QueryStateSetter<T, N>) {
        if self.key.as_deref() != Some(key)
            && let Some(previous) = self.key.replace(key.to_string())
        {
            log::warn!("render: key changed from {previous} to {key}");
            self.memo.invalidate();
        }

        let serializer = match &self.serializer {
            Some(active) if !options.dynamic => active.clone(),
            _ => {
                self.serializer = Some(serializer.clone());
                serializer
            }
        };

        let query = provider.query();
        let raw = query.get(key);

        let mut deps = vec![Dependency::Raw(raw.map(|x| x.join(DEFAULT_SEPARATOR)))];
        if options.dynamic {
            deps.push(Dependency::Identity(serializer.parse_identity()));
            deps.push(Dependency::Identity(serializer.serialize_identity()));
        }

        let value = self.memo.get(deps, || serializer.parse(raw));

        let setter = QueryStateSetter {
            key: key.to_string(),
            serializer,
            history: options.history,
            navigator: navigator.clone(),
        };

        (value, setter)
    }

    /// How many times the value has been parsed.
    #[must_use]
    pub const fn computations(&self) -> usize {
        self.memo.computations()
    }
}

/// Binds `key` to a typed value. See [`QueryState::render`].
pub fn use_query_state<T, P, N>(
    state: &mut QueryState<T>,
    key: &str,
    provider: &P,
    navigator: &N,
    serializer: Serializer<T>,
    options: QueryStateOptions,
) -> (T, QueryStateSetter<T, N>)
where
    T: Clone + 'static,
    P: QueryProvider + ?Sized,
    N: Navigator + Clone,
{
    state.render(key, provider, navigator, serializer, options)
}

/// Binds `key` to its raw value, without any conversion.
pub fn use_raw_query_state<P, N>(
    state: &mut QueryState<Option<RawValue>>,
    key: &str,
    provider: &P,
    navigator: &N,
    options: QueryStateOptions,
) -> (Option<RawValue>, QueryStateSetter<Option<RawValue>, N>)
where
    P: QueryProvider + ?Sized,
    N: Navigator + Clone,
{
    state.render(key, provider, navigator, Serializer::raw(), options)
}

/// Writes one query parameter through a [`Navigator`].
pub struct QueryStateSetter<T, N> {
    key: String,
    serializer: Serializer<T>,
    history: Option<HistoryMode>,
    navigator: N,
}

impl<T, N: Clone> Clone for QueryStateSetter<T, N> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            serializer: self.serializer.clone(),
            history: self.history,
            navigator: self.navigator.clone(),
        }
    }
}

impl<T, N> std::fmt::Debug for QueryStateSetter<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStateSetter")
            .field("key", &self.key)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, N: Navigator> QueryStateSetter<T, N> {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Submits `update` to the navigator.
    ///
    /// A value is sent as the partial patch `{ key: serialize(value) }`. A
    /// function is sent as a patch function that parses the key from the
    /// query it is applied to, so queued updates build on each other. If the
    /// function's result doesn't serialize, that query is returned unchanged.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn dispatch(
        &self,
        update: Update<T>,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        let mode = HistoryMode::resolve(options.history, self.history);

        let patch = match update {
            Update::Value(value) => QueryPatch::Partial(PartialQuery::from([(
                self.key.clone(),
                self.serializer.serialize(&value),
            )])),
            Update::Function(f) => {
                let key = self.key.clone();
                let serializer = self.serializer.clone();

                QueryPatch::function(move |query| {
                    let prev = serializer.parse(query.get(&key));
                    let Some(next) = serializer.serialize(&f(prev)) else {
                        log::trace!("dispatch: key={key} serialized to nothing, keeping previous");
                        return query.clone();
                    };
                    query.clone().merged(PartialQuery::from([(key, Some(next))]))
                })
            }
        };

        log::debug!("dispatch: key={} mode={mode} patch={patch:?}", self.key);

        self.navigator
            .navigate(mode, NavigationTarget::new(patch), transition)
    }

    /// Sets the value with default options.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn set(&self, value: T) -> Result<(), N::Error> {
        self.dispatch(Update::Value(value), SetOptions::default(), N::Transition::default())
    }

    /// Sets the value.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn set_with(
        &self,
        value: T,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        self.dispatch(Update::Value(value), options, transition)
    }

    /// Updates the value from its previous one with default options.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn update(&self, f: impl FnOnce(T) -> T + Send + 'static) -> Result<(), N::Error> {
        self.dispatch(
            Update::function(f),
            SetOptions::default(),
            N::Transition::default(),
        )
    }

    /// Updates the value from its previous one.
    ///
    /// # Errors
    ///
    /// * Whatever the navigator returns
    pub fn update_with(
        &self,
        f: impl FnOnce(T) -> T + Send + 'static,
        options: SetOptions,
        transition: N::Transition,
    ) -> Result<(), N::Error> {
        self.dispatch(Update::function(f), options, transition)
    }
}

#[cfg(all(test, feature = "simulator"))]
mod tests {
    use pretty_assertions::assert_eq;
    use query_state_models::RawQuery;

    use super::*;
    use crate::simulator::BatchRouter;

    fn integer() -> Serializer<Option<i64>> {
        Serializer::new(
            |raw| raw.and_then(|x| x.first()).and_then(|x| x.parse().ok()),
            |value: &Option<i64>| value.map(|x| RawValue::from(x.to_string())),
        )
    }

    #[test_log::test]
    fn reads_parsed_value() {
        let router = BatchRouter::<()>::from_query_string("val=123");
        let mut state = QueryState::new();

        let (value, _) = use_query_state(
            &mut state,
            "val",
            &router,
            &router,
            integer(),
            QueryStateOptions::default(),
        );

        assert_eq!(value, Some(123));
    }

    #[test_log::test]
    fn absent_key_parses_to_default() {
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();

        let (value, _) = use_raw_query_state(
            &mut state,
            "val",
            &router,
            &router,
            QueryStateOptions::default(),
        );

        assert_eq!(value, None);
    }

    #[test_log::test]
    fn value_is_reused_while_raw_value_is_unchanged() {
        let query = RawQuery::new().with("val", "1").with("other", "a");
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let serializer = integer();
        let options = QueryStateOptions::default();

        state.render("val", &query, &router, serializer.clone(), options);
        state.render("val", &query, &router, serializer.clone(), options);
        let changed_other = query.clone().with("other", "b");
        state.render("val", &changed_other, &router, serializer.clone(), options);
        assert_eq!(state.computations(), 1);

        let changed = query.with("val", "2");
        let (value, _) = state.render("val", &changed, &router, serializer, options);
        assert_eq!(value, Some(2));
        assert_eq!(state.computations(), 2);
    }

    #[test_log::test]
    fn sequences_compare_by_joined_value() {
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let options = QueryStateOptions::default();

        let single = RawQuery::new().with("tags", "a,b");
        let multiple = RawQuery::new().with("tags", vec!["a", "b"]);

        state.render("tags", &single, &router, Serializer::raw(), options);
        let (value, _) = state.render("tags", &multiple, &router, Serializer::raw(), options);

        assert_eq!(value, Some(RawValue::from("a,b")));
        assert_eq!(state.computations(), 1);
    }

    #[test_log::test]
    fn serializer_identity_is_ignored_unless_dynamic() {
        let query = RawQuery::new().with("val", "1");
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let options = QueryStateOptions::default();

        state.render("val", &query, &router, integer(), options);
        state.render("val", &query, &router, integer(), options);

        assert_eq!(state.computations(), 1);
    }

    #[test_log::test]
    fn serializer_identity_recomputes_when_dynamic() {
        let query = RawQuery::new().with("val", "1");
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let options = QueryStateOptions::new().with_dynamic(true);
        let serializer = integer();

        state.render("val", &query, &router, serializer.clone(), options);
        state.render("val", &query, &router, serializer, options);
        assert_eq!(state.computations(), 1);

        let doubled = Serializer::new(
            |raw| {
                raw.and_then(|x| x.first())
                    .and_then(|x| x.parse::<i64>().ok())
                    .map(|x| x * 2)
            },
            |value: &Option<i64>| value.map(|x| RawValue::from((x / 2).to_string())),
        );
        let (value, _) = state.render("val", &query, &router, doubled, options);

        assert_eq!(value, Some(2));
        assert_eq!(state.computations(), 2);
    }

    #[test_log::test]
    fn key_change_recomputes_value() {
        let query = RawQuery::new().with("a", "1").with("b", "1");
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let options = QueryStateOptions::default();

        state.render("a", &query, &router, integer(), options);
        state.render("a", &query, &router, integer(), options);
        assert_eq!(state.computations(), 1);

        let (value, set) = state.render("b", &query, &router, integer(), options);
        assert_eq!(value, Some(1));
        assert_eq!(set.key(), "b");
        assert_eq!(state.computations(), 2);
    }

    #[test_log::test]
    fn direct_value_is_sent_as_partial_patch() {
        let router = BatchRouter::<()>::from_query_string("val=1&other=x");
        let mut state = QueryState::new();
        let (_, set) = state.render(
            "val",
            &router,
            &router,
            integer(),
            QueryStateOptions::default(),
        );

        set.set(Some(5)).unwrap();

        let requests = router.take_pending();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].mode, HistoryMode::Replace);
        assert_eq!(
            requests[0].target.query.as_partial(),
            Some(&PartialQuery::from([(
                "val".to_string(),
                Some(RawValue::from("5"))
            )]))
        );
    }

    #[test_log::test]
    fn direct_value_without_serialization_clears_key() {
        let router = BatchRouter::<()>::from_query_string("val=1&other=x");
        router.set_auto_flush(true);
        let mut state = QueryState::new();
        let (_, set) = state.render(
            "val",
            &router,
            &router,
            integer(),
            QueryStateOptions::default(),
        );

        set.set(None).unwrap();

        assert_eq!(router.query(), RawQuery::new().with("other", "x"));
    }

    #[test_log::test]
    fn function_update_without_serialization_preserves_key() {
        let router = BatchRouter::<()>::from_query_string("val=123");
        let mut state = QueryState::new();
        let (_, set) = state.render(
            "val",
            &router,
            &router,
            integer(),
            QueryStateOptions::default(),
        );

        set.update(|_| None).unwrap();

        let request = router.take_pending().remove(0);
        let current = RawQuery::new().with("val", "123");
        assert_eq!(request.target.query.apply(&current), current);
    }

    #[test_log::test]
    fn hook_history_is_used_without_call_override() {
        let router = BatchRouter::<()>::new();
        let mut state = QueryState::new();
        let (_, set) = state.render(
            "val",
            &router,
            &router,
            Serializer::raw(),
            QueryStateOptions::new().with_history(HistoryMode::Push),
        );

        set.set(Some(RawValue::from("a"))).unwrap();
        set.set_with(Some(RawValue::from("b")), SetOptions::replace(), ())
            .unwrap();

        let modes = router
            .take_pending()
            .into_iter()
            .map(|x| x.mode)
            .collect::<Vec<_>>();
        assert_eq!(modes, vec![HistoryMode::Push, HistoryMode::Replace]);
    }
}
