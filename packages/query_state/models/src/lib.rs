//! Data types shared by the query state synchronizers.
//!
//! * [`RawValue`] - the router's native representation of one query parameter
//! * [`RawQuery`] - the full query dictionary of the current route
//! * [`PartialQuery`] - a partial patch to merge into a [`RawQuery`]
//! * [`HistoryMode`] - whether a navigation pushes or replaces a history entry

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod history;
mod query;
mod value;

pub use history::{DEFAULT_HISTORY_MODE, HistoryMode};
pub use query::{PartialQuery, RawQuery};
pub use value::{DEFAULT_SEPARATOR, RawValue};
