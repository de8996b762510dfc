use std::fmt::Display;

use strum_macros::{AsRefStr, EnumString};

/// History mode used when neither the call nor the hook configures one.
pub const DEFAULT_HISTORY_MODE: HistoryMode = HistoryMode::Replace;

/// Whether a query update creates a new history entry or overwrites the
/// current one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum HistoryMode {
    Push,
    #[default]
    Replace,
}

impl HistoryMode {
    /// Picks the first configured mode, falling back to
    /// [`DEFAULT_HISTORY_MODE`].
    ///
    /// `call` takes precedence over `hook`.
    #[must_use]
    pub fn resolve(call: Option<Self>, hook: Option<Self>) -> Self {
        call.or(hook).unwrap_or(DEFAULT_HISTORY_MODE)
    }
}

impl Display for HistoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}
