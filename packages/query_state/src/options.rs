//! Options of the synchronizers and their setters.

use query_state_models::HistoryMode;

/// Options of a single-key synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueryStateOptions {
    /// History mode used by the setter when the call doesn't pick one.
    pub history: Option<HistoryMode>,
    /// Whether a change of the serializer functions between renders
    /// recomputes the value. When `false`, the serializer given on the first
    /// render is kept.
    pub dynamic: bool,
}

impl QueryStateOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: None,
            dynamic: false,
        }
    }

    #[must_use]
    pub const fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub const fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }
}

/// Options of a multi-key synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueryStatesOptions {
    pub history: Option<HistoryMode>,
}

impl QueryStatesOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self { history: None }
    }

    #[must_use]
    pub const fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = Some(history);
        self
    }
}

/// Options of one setter call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SetOptions {
    /// Overrides the synchronizer's history mode for this call.
    pub history: Option<HistoryMode>,
}

impl SetOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self { history: None }
    }

    #[must_use]
    pub const fn push() -> Self {
        Self {
            history: Some(HistoryMode::Push),
        }
    }

    #[must_use]
    pub const fn replace() -> Self {
        Self {
            history: Some(HistoryMode::Replace),
        }
    }

    #[must_use]
    pub const fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = Some(history);
        self
    }
}
