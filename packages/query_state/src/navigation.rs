//! The read and write sides of the host router.

use std::sync::Arc;

use query_state_models::{HistoryMode, RawQuery};

use crate::NavigationTarget;

/// Supplies the current route's query parameters.
pub trait QueryProvider {
    fn query(&self) -> RawQuery;
}

impl QueryProvider for RawQuery {
    fn query(&self) -> RawQuery {
        self.clone()
    }
}

impl<P: QueryProvider + ?Sized> QueryProvider for &P {
    fn query(&self) -> RawQuery {
        (**self).query()
    }
}

impl<P: QueryProvider + ?Sized> QueryProvider for Arc<P> {
    fn query(&self) -> RawQuery {
        (**self).query()
    }
}

/// Applies query patches to the route.
///
/// Implementations own batching of concurrent requests. A
/// [`crate::QueryPatch::Partial`] target is merged into the query current at
/// application time, a [`crate::QueryPatch::Function`] target receives that
/// query and returns the complete next one.
pub trait Navigator {
    /// Options forwarded untouched from the setter call.
    type Transition: Default;
    type Error;

    /// Navigates, creating a new history entry.
    ///
    /// # Errors
    ///
    /// * Implementation defined
    fn push(&self, target: NavigationTarget, transition: Self::Transition)
    -> Result<(), Self::Error>;

    /// Navigates, overwriting the current history entry.
    ///
    /// # Errors
    ///
    /// * Implementation defined
    fn replace(
        &self,
        target: NavigationTarget,
        transition: Self::Transition,
    ) -> Result<(), Self::Error>;

    /// Calls [`Navigator::push`] or [`Navigator::replace`] depending on `mode`.
    ///
    /// # Errors
    ///
    /// * Implementation defined
    fn navigate(
        &self,
        mode: HistoryMode,
        target: NavigationTarget,
        transition: Self::Transition,
    ) -> Result<(), Self::Error> {
        match mode {
            HistoryMode::Push => self.push(target, transition),
            HistoryMode::Replace => self.replace(target, transition),
        }
    }
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    type Transition = N::Transition;
    type Error = N::Error;

    fn push(
        &self,
        target: NavigationTarget,
        transition: Self::Transition,
    ) -> Result<(), Self::Error> {
        (**self).push(target, transition)
    }

    fn replace(
        &self,
        target: NavigationTarget,
        transition: Self::Transition,
    ) -> Result<(), Self::Error> {
        (**self).replace(target, transition)
    }
}
