//! Runtime settings read from the environment (after `.env` is loaded).

use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "BIKESHARE_DATA_DIR";
pub const LOG_FILE_VAR: &str = "LOG_FILE_PATH";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_FILE: &str = "logs/bikeshare_stats.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `chicago.csv`, `new_york_city.csv` and `washington.csv`.
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup; empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            data_dir: get(DATA_DIR_VAR, DEFAULT_DATA_DIR),
            log_file: get(LOG_FILE_VAR, DEFAULT_LOG_FILE),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);

        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.log_file, PathBuf::from("logs/bikeshare_stats.log"));
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(DATA_DIR_VAR, "/srv/bikeshare"), (LOG_FILE_VAR, "  ")]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/bikeshare"));
        assert_eq!(settings.log_file, PathBuf::from("logs/bikeshare_stats.log"));
    }

    #[test]
    fn test_cli_override() {
        let settings = Settings::from_lookup(|_| None).with_data_dir(Some("fixtures".into()));
        assert_eq!(settings.data_dir, PathBuf::from("fixtures"));

        let settings = settings.with_data_dir(None);
        assert_eq!(settings.data_dir, PathBuf::from("fixtures"));
    }
}
