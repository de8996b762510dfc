//! Query patches and setter updates.

use query_state_models::{PartialQuery, RawQuery};

/// Computes the next full query from the current one.
pub type PatchFn = Box<dyn FnOnce(&RawQuery) -> RawQuery + Send>;

/// Describes how the next query is derived from the current one.
pub enum QueryPatch {
    /// Merged into the current query. See [`RawQuery::merge`].
    Partial(PartialQuery),
    /// Replaces the current query with its output.
    Function(PatchFn),
}

impl QueryPatch {
    pub fn function(f: impl FnOnce(&RawQuery) -> RawQuery + Send + 'static) -> Self {
        Self::Function(Box::new(f))
    }

    /// Applies the patch to `current`, returning the next query.
    #[must_use]
    pub fn apply(self, current: &RawQuery) -> RawQuery {
        match self {
            Self::Partial(patch) => current.clone().merged(patch),
            Self::Function(f) => f(current),
        }
    }

    #[must_use]
    pub const fn as_partial(&self) -> Option<&PartialQuery> {
        match self {
            Self::Partial(patch) => Some(patch),
            Self::Function(_) => None,
        }
    }

    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl std::fmt::Debug for QueryPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partial(patch) => f.debug_tuple("Partial").field(patch).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<PartialQuery> for QueryPatch {
    fn from(value: PartialQuery) -> Self {
        Self::Partial(value)
    }
}

/// The navigation target handed to a [`crate::Navigator`].
#[derive(Debug)]
pub struct NavigationTarget {
    pub query: QueryPatch,
}

impl NavigationTarget {
    #[must_use]
    pub const fn new(query: QueryPatch) -> Self {
        Self { query }
    }
}

/// An update passed to a setter: either the next value itself or a function
/// computing it from the previous one.
pub enum Update<Prev, Next = Prev> {
    Value(Next),
    Function(Box<dyn FnOnce(Prev) -> Next + Send>),
}

impl<Prev, Next> Update<Prev, Next> {
    pub fn function(f: impl FnOnce(Prev) -> Next + Send + 'static) -> Self {
        Self::Function(Box::new(f))
    }
}

impl<Prev, Next: std::fmt::Debug> std::fmt::Debug for Update<Prev, Next> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use query_state_models::RawValue;

    use super::*;

    #[test_log::test]
    fn partial_patch_merges_into_current() {
        let current = RawQuery::new().with("a", "1").with("b", "2");
        let patch = QueryPatch::from(PartialQuery::from([(
            "a".to_string(),
            Some(RawValue::from("3")),
        )]));

        assert!(!patch.is_function());
        assert_eq!(
            patch.apply(&current),
            RawQuery::new().with("a", "3").with("b", "2")
        );
    }

    #[test_log::test]
    fn function_patch_replaces_current() {
        let current = RawQuery::new().with("a", "1").with("b", "2");
        let patch = QueryPatch::function(|_| RawQuery::new().with("c", "3"));

        assert!(patch.is_function());
        assert!(patch.as_partial().is_none());
        assert_eq!(patch.apply(&current), RawQuery::new().with("c", "3"));
    }

    #[test_log::test]
    fn debug_hides_functions() {
        let patch = QueryPatch::function(|query| query.clone());
        assert_eq!(format!("{patch:?}"), "Function(..)");

        let update: Update<i32> = Update::function(|n| n + 1);
        assert_eq!(format!("{update:?}"), "Function(..)");
        assert_eq!(format!("{:?}", Update::<i32>::Value(1)), "Value(1)");
    }
}
