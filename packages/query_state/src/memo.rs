//! Dependency-tracked caching of derived values.
//!
//! The host framework decides when a component renders. This module only
//! decides whether a value computed on a previous render can be reused, by
//! comparing the dependency list assembled for the current render with the
//! one the cached value was computed from.

/// One entry of a dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// A raw query value, flattened into one string. `None` when absent.
    Raw(Option<String>),
    /// The identity of a shared function.
    Identity(usize),
}

/// A cached value and the dependencies it was computed from.
#[derive(Debug)]
pub struct Memo<T> {
    cached: Option<(Vec<Dependency>, T)>,
    computations: usize,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            cached: None,
            computations: 0,
        }
    }
}

impl<T: Clone> Memo<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if `deps` equals the cached dependency list,
    /// otherwise calls `compute` and caches its result.
    pub fn get(&mut self, deps: Vec<Dependency>, compute: impl FnOnce() -> T) -> T {
        if let Some((cached_deps, value)) = &self.cached
            && *cached_deps == deps
        {
            return value.clone();
        }

        log::trace!("get: recomputing deps={deps:?}");

        let value = compute();
        self.computations += 1;
        self.cached = Some((deps, value.clone()));
        value
    }

    /// How many times the value has been computed.
    #[must_use]
    pub const fn computations(&self) -> usize {
        self.computations
    }

    /// Drops the cached value so the next [`Memo::get`] recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
