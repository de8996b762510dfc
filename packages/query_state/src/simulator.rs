//! In-memory router for tests and demos.
//!
//! [`BatchRouter`] queues every navigation request and applies them in
//! submission order on [`BatchRouter::flush`], each against the query produced
//! by the previous one. It keeps a history stack so push and replace can be
//! told apart.

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{Arc, PoisonError, RwLock, RwLockWriteGuard},
};

use query_state_models::{HistoryMode, RawQuery};

use crate::{NavigationTarget, Navigator, QueryProvider};

/// A queued navigation.
#[derive(Debug)]
pub struct NavigationRequest<X> {
    pub mode: HistoryMode,
    pub target: NavigationTarget,
    pub transition: X,
}

/// A navigation that has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedNavigation<X> {
    pub mode: HistoryMode,
    pub transition: X,
    pub query: RawQuery,
}

#[derive(Debug)]
struct State<X> {
    entries: Vec<RawQuery>,
    index: usize,
    pending: VecDeque<NavigationRequest<X>>,
    applied: Vec<AppliedNavigation<X>>,
    auto_flush: bool,
}

pub struct BatchRouter<X = ()> {
    state: Arc<RwLock<State<X>>>,
}

impl<X> Clone for BatchRouter<X> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<X> Default for BatchRouter<X> {
    fn default() -> Self {
        Self::with_query(RawQuery::new())
    }
}

impl<X> std::fmt::Debug for BatchRouter<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("BatchRouter")
            .field("entries", &state.entries)
            .field("index", &state.index)
            .field("pending", &state.pending.len())
            .field("auto_flush", &state.auto_flush)
            .finish()
    }
}

impl<X> BatchRouter<X> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(query: RawQuery) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                entries: vec![query],
                index: 0,
                pending: VecDeque::new(),
                applied: vec![],
                auto_flush: false,
            })),
        }
    }

    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        Self::with_query(RawQuery::parse(query))
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<X>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// When enabled, requests are applied as soon as they are submitted.
    pub fn set_auto_flush(&self, auto_flush: bool) {
        self.write().auto_flush = auto_flush;
    }

    /// Number of queued requests.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    /// Removes the queued requests without applying them.
    pub fn take_pending(&self) -> Vec<NavigationRequest<X>> {
        self.write().pending.drain(..).collect()
    }

    /// Applies every queued request in submission order and returns how many
    /// were applied.
    pub fn flush(&self) -> usize {
        let mut count = 0;

        loop {
            let (request, current) = {
                let mut state = self.write();
                let Some(request) = state.pending.pop_front() else {
                    break;
                };
                let current = state.entries[state.index].clone();
                (request, current)
            };

            let next = request.target.query.apply(&current);
            log::debug!("flush: mode={} query={next}", request.mode);

            let mut state = self.write();
            match request.mode {
                HistoryMode::Push => {
                    let index = state.index + 1;
                    state.entries.truncate(index);
                    state.entries.push(next.clone());
                    state.index = index;
                }
                HistoryMode::Replace => {
                    let index = state.index;
                    state.entries[index] = next.clone();
                }
            }
            state.applied.push(AppliedNavigation {
                mode: request.mode,
                transition: request.transition,
                query: next,
            });
            count += 1;
        }

        count
    }

    /// The history stack, oldest entry first.
    #[must_use]
    pub fn history(&self) -> Vec<RawQuery> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    /// Moves to the previous history entry. Returns `false` at the start.
    pub fn back(&self) -> bool {
        let mut state = self.write();
        if state.index == 0 {
            return false;
        }
        state.index -= 1;
        true
    }

    /// Moves to the next history entry. Returns `false` at the end.
    pub fn forward(&self) -> bool {
        let mut state = self.write();
        if state.index + 1 >= state.entries.len() {
            return false;
        }
        state.index += 1;
        true
    }

    fn submit(&self, mode: HistoryMode, target: NavigationTarget, transition: X) {
        let auto_flush = {
            let mut state = self.write();
            state.pending.push_back(NavigationRequest {
                mode,
                target,
                transition,
            });
            state.auto_flush
        };

        if auto_flush {
            self.flush();
        }
    }
}

impl<X: Clone> BatchRouter<X> {
    /// Every navigation applied so far, in order.
    #[must_use]
    pub fn applied(&self) -> Vec<AppliedNavigation<X>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .applied
            .clone()
    }

    /// The transition options of every navigation applied so far.
    #[must_use]
    pub fn transitions(&self) -> Vec<X> {
        self.applied().into_iter().map(|x| x.transition).collect()
    }
}

impl<X> QueryProvider for BatchRouter<X> {
    fn query(&self) -> RawQuery {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries[state.index].clone()
    }
}

impl<X: Default> Navigator for BatchRouter<X> {
    type Transition = X;
    type Error = Infallible;

    fn push(&self, target: NavigationTarget, transition: X) -> Result<(), Infallible> {
        self.submit(HistoryMode::Push, target, transition);
        Ok(())
    }

    fn replace(&self, target: NavigationTarget, transition: X) -> Result<(), Infallible> {
        self.submit(HistoryMode::Replace, target, transition);
        Ok(())
    }
}
