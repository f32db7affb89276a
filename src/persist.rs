//! Persisted UI state
//!
//! `state.json` holds one entry per namespace key:
//!
//! ```json
//! { "taskboard-ui": { "state": { "searchTerm": "coffee" }, "version": 0 } }
//! ```
//!
//! Only UI fields live here. Tasks and auth flags are never written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Storage;
use crate::store::UiState;

/// Current layout version of a persisted entry
pub const STATE_VERSION: u32 = 0;

/// The subset of [`UiState`] that survives restarts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedUi {
    #[serde(default)]
    pub search_term: String,
}

impl PersistedUi {
    pub fn from_ui(ui: &UiState) -> Self {
        Self {
            search_term: ui.search_term.clone(),
        }
    }

    /// Copy persisted fields onto live UI state.
    pub fn apply_to(&self, ui: &mut UiState) {
        ui.search_term = self.search_term.clone();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    state: PersistedUi,
    #[serde(default)]
    version: u32,
}

/// Whole-file view; other keys are kept as opaque JSON.
type StateFile = BTreeMap<String, serde_json::Value>;

/// Load the entry under `key`. Missing file or key yields defaults.
pub fn load(storage: &Storage, key: &str) -> Result<PersistedUi> {
    let file: StateFile = storage.read_json_or_default(&storage.state_file())?;
    let Some(value) = file.get(key) else {
        return Ok(PersistedUi::default());
    };
    match serde_json::from_value::<Entry>(value.clone()) {
        Ok(entry) => Ok(entry.state),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring unreadable persisted state");
            Ok(PersistedUi::default())
        }
    }
}

/// Write the UI fields of `ui` under `key`, leaving other keys untouched.
pub fn save(storage: &Storage, key: &str, ui: &UiState) -> Result<()> {
    let entry = Entry {
        state: PersistedUi::from_ui(ui),
        version: STATE_VERSION,
    };
    let value = serde_json::to_value(&entry)?;
    storage.update_json(&storage.state_file(), |file: &mut StateFile| {
        file.insert(key.to_string(), value);
        Ok(())
    })?;
    tracing::debug!(key, "saved ui state");
    Ok(())
}
