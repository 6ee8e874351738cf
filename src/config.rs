use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf, time::Duration};

pub const APP_DIR: &str = "cli-pomodoro";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub username: Option<String>,
    pub store_url: Option<String>,
    pub default_task: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    pub tick_millis: u64,
    pub settle_secs: u64,
    pub retry_backoff_millis: u64,
    pub store_timeout_secs: u64,
    pub tolerate_offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            store_url: None,
            default_task: "coding".into(),
            sound_enabled: true,
            notifications_enabled: true,
            tick_millis: 1000,
            settle_secs: 5,
            retry_backoff_millis: 500,
            store_timeout_secs: 10,
            tolerate_offline: false,
        }
    }
}

impl Config {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_millis)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

pub fn get_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(".");
    path.push(APP_DIR);
    let _ = fs::create_dir_all(&path);
    path.push(filename);
    path
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &PathBuf) -> T {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_json<T: Serialize>(path: &PathBuf, data: &T) -> io::Result<()> {
    fs::write(path, serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"username": "alice", "tick_millis": 250}"#).unwrap();
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.default_task, "coding");
        assert_eq!(config.settle(), Duration::from_secs(5));
        assert!(!config.tolerate_offline);
    }

    #[test]
    fn zero_tick_is_clamped() {
        let config = Config {
            tick_millis: 0,
            ..Config::default()
        };
        assert_eq!(config.tick(), Duration::from_millis(1));
    }

    #[test]
    fn missing_or_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        assert_eq!(load_json::<Config>(&missing), Config::default());

        fs::write(&missing, "not json").unwrap();
        assert_eq!(load_json::<Config>(&missing), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            store_url: Some("https://example.firebaseio.com".into()),
            sound_enabled: false,
            ..Config::default()
        };
        save_json(&path, &config).unwrap();
        assert_eq!(load_json::<Config>(&path), config);
    }
}
