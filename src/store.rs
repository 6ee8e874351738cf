//! Key-value backends for session history.
//!
//! Every backend exposes the same slash-separated path space
//! (`users/alice/coding`) holding JSON values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::StoreError;

pub trait KvStore {
    /// Returns `None` when nothing is stored at `path`.
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;
    /// Overwrites the value at `path`.
    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError>;
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path)
        .try_fold(root, |node, seg| node.get(seg))
        .filter(|v| !v.is_null())
}

fn insert(root: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let malformed = || StoreError::Malformed {
        path: path.to_string(),
    };
    let mut segs = segments(path).peekable();
    let mut node = root;

    while let Some(seg) = segs.next() {
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        let current = node;
        let map = match current {
            Value::Object(map) => map,
            _ => return Err(malformed()),
        };
        if segs.peek().is_none() {
            map.insert(seg.to_string(), value);
            return Ok(());
        }
        node = map.entry(seg.to_string()).or_insert(Value::Null);
    }

    Err(malformed())
}

// ============================================================================
// In-memory
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: Value,
}

#[cfg(test)]
impl KvStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(lookup(&self.root, path).cloned())
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        insert(&mut self.root, path, value)
    }
}

// ============================================================================
// Local JSON file
// ============================================================================

/// The whole tree lives in one pretty-printed JSON file, rewritten on
/// every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    root: Value,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let root = match fs::read_to_string(path) {
            Ok(s) if s.trim().is_empty() => Value::Null,
            Ok(s) => serde_json::from_str(&s)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Null,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }
}

impl KvStore for FileStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(lookup(&self.root, path).cloned())
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        insert(&mut self.root, path, value)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.root)?)?;
        Ok(())
    }
}

// ============================================================================
// Remote REST database
// ============================================================================

/// A Firebase-style realtime database: `GET`/`PUT {base}/{path}.json`.
pub struct RemoteStore {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn url(&self, path: &str) -> String {
        let encoded: Vec<String> = segments(path).map(encode_segment).collect();
        format!("{}/{}.json", self.base_url, encoded.join("/"))
    }
}

impl KvStore for RemoteStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let mut response = self.agent.get(&self.url(path)).call()?;
        let value: Value = response.body_mut().read_json()?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        self.agent.put(&self.url(path)).send_json(&value)?;
        Ok(())
    }
}

fn encode_segment(seg: &str) -> String {
    urlencoding::encode(seg).into_owned()
}
