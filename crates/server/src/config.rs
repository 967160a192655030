//! Server configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

/// Where the server reads content, stores profiles and writes logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub save_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Overrides `sweep_interval_secs` from `config.toml` when set.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_dir: default_save_dir(),
            log_dir: default_log_dir(),
            sweep_interval_secs: None,
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ECONOMY_DATA_DIR` - Directory holding `catalog.ron`, `rewards.ron` and `config.toml` (default: `data`)
    /// - `ECONOMY_SAVE_DIR` - Directory for entity profiles (default: platform data dir)
    /// - `ECONOMY_LOG_DIR` - Directory for log files (default: platform cache dir)
    /// - `ECONOMY_SWEEP_INTERVAL_SECS` - Seconds between expiry sweeps (default: from `config.toml`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("ECONOMY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ECONOMY_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ECONOMY_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        config.sweep_interval_secs = lookup("ECONOMY_SWEEP_INTERVAL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.max(1));

        config
    }
}

/// Platform data directory for saved profiles.
///
/// - Linux: `~/.local/share/economy/profiles`
/// - macOS: `~/Library/Application Support/economy/profiles`
/// - Windows: `%APPDATA%\economy\profiles`
fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "economy")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("profiles")
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "economy")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/economy"))
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.save_dir.ends_with("profiles"));
    }

    #[test]
    fn environment_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ECONOMY_DATA_DIR", "/srv/economy/data"),
            ("ECONOMY_SAVE_DIR", "/srv/economy/profiles"),
            ("ECONOMY_SWEEP_INTERVAL_SECS", "0"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/economy/data"));
        assert_eq!(config.save_dir, PathBuf::from("/srv/economy/profiles"));
        assert_eq!(config.sweep_interval_secs, Some(1));
    }

    #[test]
    fn unparsable_interval_is_ignored() {
        let config =
            ServerConfig::from_lookup(lookup(&[("ECONOMY_SWEEP_INTERVAL_SECS", "soon")]));
        assert_eq!(config.sweep_interval_secs, None);
    }
}
