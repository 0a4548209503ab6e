//! Component load state.

use serde::{Deserialize, Serialize};

/// Where a controller is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet, or state was cleared.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch finished, successfully or not.
    Loaded,
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}
