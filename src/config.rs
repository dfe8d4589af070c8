use std::fs;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_BAR_WIDTH: usize = 20;
const MIN_BAR_WIDTH: usize = 5;
const MAX_BAR_WIDTH: usize = 200;

/// Runtime settings, read from `RECURDO_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location of the tasks file.
    pub db_path: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `recurdo=debug`.
    pub log_filter: String,
    /// Width in characters of rendered progress bars.
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Invalid values
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            db_path: lookup("RECURDO_DB")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            ..Self::default_without_path()
        };
        if let Some(filter) = lookup("RECURDO_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter.trim().to_string();
            }
        }
        if let Some(width) = lookup("RECURDO_BAR_WIDTH") {
            if let Ok(value) = width.trim().parse::<usize>() {
                config.bar_width = value.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
            }
        }
        config
    }

    /// Log file used by the TUI, next to the tasks file.
    pub fn log_path(&self) -> PathBuf {
        let mut p = self.db_path.clone();
        p.set_file_name("recurdo.log");
        p
    }

    fn default_without_path() -> Self {
        Self {
            db_path: PathBuf::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

/// `~/.local/share/recurdo/tasks.json` on Linux, `./tasks.json` when no
/// data directory is known.
fn default_db_path() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("recurdo");
    if !p.exists() {
        let _ = fs::create_dir_all(&p);
    }
    p.push("tasks.json");
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RECURDO_DB", "/tmp/r/tasks.json"),
            ("RECURDO_LOG", "recurdo=debug"),
            ("RECURDO_BAR_WIDTH", "32"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/r/tasks.json"));
        assert_eq!(config.log_filter, "recurdo=debug");
        assert_eq!(config.bar_width, 32);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/r/recurdo.log"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("RECURDO_DB", "/tmp/r/tasks.json"),
            ("RECURDO_LOG", "  "),
            ("RECURDO_BAR_WIDTH", "wide"),
        ]));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.bar_width, DEFAULT_BAR_WIDTH);

        let narrow = Config::from_lookup(lookup(&[("RECURDO_DB", "/tmp/x.json"), ("RECURDO_BAR_WIDTH", "1")]));
        assert_eq!(narrow.bar_width, MIN_BAR_WIDTH);

        let huge = Config::from_lookup(lookup(&[("RECURDO_DB", "/tmp/x.json"), ("RECURDO_BAR_WIDTH", "65535")]));
        assert_eq!(huge.bar_width, MAX_BAR_WIDTH);
    }
}
