//! Configuration loading and discovery for `fviz.toml`
//!
//! Provides functions to find and load configuration.

use super::schema::FvizConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "fviz.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse fviz.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find fviz.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for fviz.toml
/// 2. Check XDG_CONFIG_HOME/fviz/fviz.toml (or ~/.config/fviz/fviz.toml)
pub fn find_config() -> Option<PathBuf> {
    env::current_dir()
        .ok()
        .and_then(find_config_from)
        .or_else(find_xdg_config)
}

/// Find fviz.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("fviz").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find fviz.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise uses
/// `find_config()`; when nothing is found the defaults are returned.
/// Relative asset paths are resolved against the config file's directory.
pub fn load_config(path: Option<&Path>) -> Result<FvizConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(FvizConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FvizConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: FvizConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.resolve_paths(base);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "seed = 1\n").expect("should write config");

        let subdir = temp.path().join("foods").join("extra");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        assert_eq!(find_config_from(subdir), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("should create subdirectories");
        let found = find_config_from(nested);
        // A config above the temp dir would be found; it must not be ours
        if let Some(path) = found {
            assert!(!path.starts_with(temp.path()));
        }
    }

    #[test]
    fn test_load_config_resolves_assets() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[assets]\nfoods = \"food-data\"\n").expect("should write config");

        let config = load_config(Some(&config_path)).expect("should load config");
        assert_eq!(config.assets.foods, temp.path().join("food-data"));
        assert_eq!(config.assets.automation, temp.path().join("vi_auto_data.json"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[timing\n").expect("should write config");
        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[timing]\ntransition_ms = 0\n").expect("should write config");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec!["timing.transition_ms: must be a positive integer"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
