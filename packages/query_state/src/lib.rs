//! Typed state synchronized with the query string of the current route.
//!
//! UI code reads and writes named query parameters as if they were ordinary
//! component state. Reads go through a [`QueryProvider`], writes are turned
//! into a [`QueryPatch`] and handed to a [`Navigator`], which owns the actual
//! URL transition and the batching of concurrent updates.
//!
//! * [`use_query_state`] binds one parameter to one typed value
//! * [`use_query_states`] binds a [`KeyMap`] of parameters and updates them
//!   in a single navigation
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "simulator")]
//! # {
//! use query_state::{
//!     QueryProvider as _, QueryState, QueryStateOptions, RawQuery, RawValue, Serializer,
//!     simulator::BatchRouter, use_query_state,
//! };
//!
//! let page = Serializer::new(
//!     |raw| raw.and_then(|x| x.first()).and_then(|x| x.parse().ok()).unwrap_or(1_u32),
//!     |page: &u32| Some(RawValue::from(page.to_string())),
//! );
//!
//! let router = BatchRouter::<()>::from_query_string("page=2&sort=asc");
//! let mut state = QueryState::new();
//!
//! let (current, set_page) = use_query_state(
//!     &mut state,
//!     "page",
//!     &router,
//!     &router,
//!     page,
//!     QueryStateOptions::default(),
//! );
//! assert_eq!(current, 2);
//!
//! set_page.update(|page| page + 1).unwrap();
//! router.flush();
//!
//! assert_eq!(router.query(), RawQuery::parse("page=3&sort=asc"));
//! # }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod memo;
mod multi;
mod navigation;
mod options;
mod patch;
mod serializer;
mod single;

#[cfg(feature = "simulator")]
pub mod simulator;

pub use memo::{Dependency, Memo};
pub use multi::{KeyMap, PartialValues, QueryStatesSetter, QueryValues, use_query_states};
pub use navigation::{Navigator, QueryProvider};
pub use options::{QueryStateOptions, QueryStatesOptions, SetOptions};
pub use patch::{NavigationTarget, PatchFn, QueryPatch, Update};
pub use query_state_models::{
    DEFAULT_HISTORY_MODE, DEFAULT_SEPARATOR, HistoryMode, PartialQuery, RawQuery, RawValue,
};
pub use serializer::{ParseFn, SerializeFn, Serializer, default_serializer};
pub use single::{QueryState, QueryStateSetter, use_query_state, use_raw_query_state};
