use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/tunnelmux.sock")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Settings {
    pub fn settings_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tunnelmux")
            .join("tunnelmux-ui.toml")
    }

    pub fn load() -> Self {
        let path = Self::settings_file_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    log::info!("[settings] loaded from {}", path.display());
                    settings
                }
                Err(error) => {
                    log::warn!("[settings] failed to parse {}: {error}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "[settings] no settings file at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    // The interval timer rejects a zero period, so a misconfigured value is
    // clamped rather than trusted.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.socket_path, PathBuf::from("/tmp/tunnelmux.sock"));
        assert_eq!(settings.poll_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let settings: Settings = toml::from_str("poll_interval_ms = 0").unwrap();
        assert_eq!(settings.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let settings: Settings = toml::from_str("poll_interval_ms = 250").unwrap();
        assert_eq!(settings.poll_interval(), Duration::from_millis(250));
        assert_eq!(settings.socket_path, PathBuf::from("/tmp/tunnelmux.sock"));

        let settings: Settings = toml::from_str(r#"socket_path = "/run/mux.sock""#).unwrap();
        assert_eq!(settings.socket_path, PathBuf::from("/run/mux.sock"));
    }
}
