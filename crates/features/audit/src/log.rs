use crate::state::AppState;
use lockbox_domain::access::{AccessAction, AccessRecord, SecretValue};
use lockbox_domain::config::ConfigSnapshot;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub(crate) type History = BTreeMap<String, Vec<AccessRecord>>;

/// Append-only access history keyed by category name.
///
/// A category's sequence only grows. The whole log is swapped out by [`AccessLog::replace`]
/// during a restore and at no other time.
///
/// Values are kept in plaintext because a restore replays them into storage.
#[derive(Debug, Default)]
pub struct AccessLog {
    entries: RwLock<History>,
}

impl AccessLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, category: &str, value: impl Into<SecretValue>, action: AccessAction) {
        let record = AccessRecord::new(value, action);
        let mut entries = self.entries.write();
        let history = entries.entry(category.to_owned()).or_default();
        history.push(record);
        debug!(category, %action, position = history.len(), "Access recorded");
    }

    /// A copy of the history of `category`, oldest first. Empty if never accessed.
    #[must_use]
    pub fn history(&self, category: &str) -> Vec<AccessRecord> {
        self.entries.read().get(category).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn last_record(&self, category: &str) -> Option<AccessRecord> {
        self.entries.read().get(category).and_then(|h| h.last().cloned())
    }

    /// The value of the most recent modification of `category`, scanning newest to oldest.
    #[must_use]
    pub fn last_modification(&self, category: &str) -> Option<SecretValue> {
        self.entries
            .read()
            .get(category)?
            .iter()
            .rev()
            .find(|record| record.is_modification())
            .map(|record| record.value.clone())
    }

    /// Category names in sorted order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of categories with at least one record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    /// Deep-copies the log together with `config` into a new [`AppState`].
    #[must_use]
    pub fn capture(&self, config: ConfigSnapshot) -> AppState {
        let history = self.entries.read().clone();
        AppState::new(history, config)
    }

    /// Discards the live history and installs a deep copy of the one in `state`.
    pub fn replace(&self, state: &AppState) {
        let fresh = state.history().clone();
        let categories = fresh.len();
        *self.entries.write() = fresh;
        info!(categories, "Access log replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_append_in_order() {
        let log = AccessLog::new();
        log.record("email", "one", AccessAction::Modification);
        log.record("email", "one", AccessAction::Consultation);
        log.record("email", "two", AccessAction::Modification);

        let history = log.history("email");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], AccessRecord::modification("one"));
        assert_eq!(history[1], AccessRecord::consultation("one"));
        assert_eq!(log.last_record("email"), Some(AccessRecord::modification("two")));
    }

    #[test]
    fn unknown_category_has_empty_history() {
        let log = AccessLog::new();
        assert!(log.history("nope").is_empty());
        assert_eq!(log.last_record("nope"), None);
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn categories_are_sorted() {
        let log = AccessLog::new();
        log.record("social", "a", AccessAction::Modification);
        log.record("bank", "b", AccessAction::Modification);
        log.record("email", "c", AccessAction::Consultation);

        assert_eq!(log.categories(), ["bank", "email", "social"]);
        assert_eq!(log.total_records(), 3);
    }
}
