use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::KvStore;

/// Task name to total minutes worked.
pub type TaskTotals = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub minutes: u64,
}

// Characters a path key may not contain: the separator plus what Firebase
// forbids in keys.
const FORBIDDEN: [char; 6] = ['/', '.', '$', '#', '[', ']'];

/// Whether `name` can be used as a single path segment.
pub fn is_valid_key(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| FORBIDDEN.contains(&c) || c.is_control())
}

pub fn check_key(name: &str) -> Result<&str, StoreError> {
    if is_valid_key(name) {
        Ok(name)
    } else {
        Err(StoreError::InvalidKey {
            name: name.to_string(),
        })
    }
}

fn user_path(username: &str) -> Result<String, StoreError> {
    Ok(format!("users/{}", check_key(username)?))
}

fn record_path(username: &str, task: &str) -> Result<String, StoreError> {
    Ok(format!("users/{}/{}", check_key(username)?, check_key(task)?))
}

/// Per-user, per-task minute totals on top of any [`KvStore`].
pub struct HistoryAdapter {
    store: Box<dyn KvStore>,
}

impl HistoryAdapter {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// An unknown user is not an error; it yields an empty map.
    pub fn load(&self, username: &str) -> Result<TaskTotals, StoreError> {
        let path = user_path(username)?;
        let mut totals = TaskTotals::new();

        match self.store.get(&path)? {
            None => {}
            Some(serde_json::Value::Object(tasks)) => {
                for (task, value) in tasks {
                    match serde_json::from_value::<HistoryRecord>(value) {
                        Ok(record) => {
                            totals.insert(task, record.minutes);
                        }
                        Err(e) => {
                            tracing::warn!(user = username, task = %task, "skipping unreadable history record: {}", e);
                        }
                    }
                }
            }
            Some(_) => return Err(StoreError::Malformed { path }),
        }

        Ok(totals)
    }

    #[cfg(test)]
    pub fn total(&self, username: &str, task: &str) -> Result<u64, StoreError> {
        match self.store.get(&record_path(username, task)?)? {
            Some(value) => Ok(serde_json::from_value::<HistoryRecord>(value)?.minutes),
            None => Ok(0),
        }
    }

    /// Read-modify-write increment. Returns the new total. The session
    /// controller writes absolute totals through [`Self::record`] instead.
    #[cfg(test)]
    pub fn commit(&mut self, username: &str, task: &str, minutes_to_add: u64) -> Result<u64, StoreError> {
        let total = self.total(username, task)? + minutes_to_add;
        self.record(username, task, total)?;
        Ok(total)
    }

    /// Writes an absolute total. Repeating the same call is harmless.
    pub fn record(&mut self, username: &str, task: &str, total: u64) -> Result<(), StoreError> {
        let value = serde_json::to_value(HistoryRecord { minutes: total })?;
        self.store.set(&record_path(username, task)?, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn adapter() -> HistoryAdapter {
        HistoryAdapter::new(Box::new(MemoryStore::default()))
    }

    #[test]
    fn new_user_loads_empty() {
        assert!(adapter().load("new-user").unwrap().is_empty());
    }

    #[test]
    fn commit_then_load() {
        let mut history = adapter();
        history.commit("new-user", "coding", 5).unwrap();

        let totals = history.load("new-user").unwrap();
        assert_eq!(totals, TaskTotals::from([("coding".to_string(), 5)]));
    }

    #[test]
    fn commit_adds_to_existing_total() {
        let mut history = adapter();
        assert_eq!(history.commit("alice", "coding", 25).unwrap(), 25);
        assert_eq!(history.commit("alice", "coding", 25).unwrap(), 50);
        assert_eq!(history.total("alice", "coding").unwrap(), 50);
    }

    #[test]
    fn record_is_idempotent() {
        let mut history = adapter();
        history.record("alice", "writing", 75).unwrap();
        history.record("alice", "writing", 75).unwrap();
        assert_eq!(history.total("alice", "writing").unwrap(), 75);
    }

    #[test]
    fn users_are_isolated() {
        let mut history = adapter();
        history.commit("alice", "coding", 25).unwrap();
        assert!(history.load("bob").unwrap().is_empty());
    }

    #[test]
    fn unreadable_records_are_skipped() {
        let mut store = MemoryStore::default();
        store.set("users/carol/coding", json!({"minutes": 30})).unwrap();
        store.set("users/carol/broken", json!("thirty")).unwrap();

        let totals = HistoryAdapter::new(Box::new(store)).load("carol").unwrap();
        assert_eq!(totals, TaskTotals::from([("coding".to_string(), 30)]));
    }

    #[test]
    fn key_rules() {
        assert!(is_valid_key("coding"));
        assert!(is_valid_key("deep work"));
        for bad in ["", "a/b", "v1.2", "$x", "#1", "[a]", "tab\there"] {
            assert!(!is_valid_key(bad), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn empty_task_cannot_overwrite_the_user_node() {
        let mut history = adapter();
        history.record("u", "coding", 100).unwrap();

        let err = history.record("u", "", 1).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
        assert_eq!(
            history.load("u").unwrap(),
            TaskTotals::from([("coding".to_string(), 100)])
        );
    }

    #[test]
    fn slash_in_task_is_rejected() {
        let mut history = adapter();
        assert!(matches!(
            history.commit("u", "a/b", 1),
            Err(StoreError::InvalidKey { ref name }) if name == "a/b"
        ));
        assert!(history.load("u").unwrap().is_empty());
    }

    #[test]
    fn empty_user_cannot_read_every_user() {
        let mut history = adapter();
        history.record("alice", "coding", 25).unwrap();
        assert!(matches!(history.load(""), Err(StoreError::InvalidKey { .. })));
    }

    #[test]
    fn scalar_user_node_is_malformed() {
        let mut store = MemoryStore::default();
        store.set("users/dave", json!(12)).unwrap();

        let err = HistoryAdapter::new(Box::new(store)).load("dave").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref path } if path == "users/dave"));
    }
}
