use crate::log::History;
use lockbox_domain::access::{AccessRecord, SecretValue};
use lockbox_domain::config::ConfigSnapshot;
use std::collections::BTreeMap;

/// A frozen capture of the access history and the runtime config.
///
/// Built only by [`AccessLog::capture`](crate::AccessLog::capture) and never mutated
/// afterwards. It owns its data; later changes to the live log do not reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    history: History,
    config: ConfigSnapshot,
}

impl AppState {
    pub(crate) const fn new(history: History, config: ConfigSnapshot) -> Self {
        Self { history, config }
    }

    #[must_use]
    pub const fn history(&self) -> &BTreeMap<String, Vec<AccessRecord>> {
        &self.history
    }

    #[must_use]
    pub const fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.history.keys().map(String::as_str).collect()
    }

    /// The value of the most recent modification of `category`, scanning newest to oldest.
    #[must_use]
    pub fn last_modification(&self, category: &str) -> Option<&SecretValue> {
        self.history
            .get(category)?
            .iter()
            .rev()
            .find(|record| record.is_modification())
            .map(|record| &record.value)
    }
}
