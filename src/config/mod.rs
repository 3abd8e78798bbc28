mod schema;
mod validation;

pub use schema::Config;
pub use validation::validate_config;

use crate::reference::DataSource;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/popa/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("popa")
}

/// Get the default config file path (~/.config/popa/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/popa/config.yaml), and a missing default file means defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

impl Config {
    /// Where to find the reference tables, honoring a command-line override.
    /// None means no directory was given and the built-in tables apply.
    pub fn data_source(&self, data_dir_override: Option<PathBuf>) -> Option<DataSource> {
        let dir = data_dir_override.or_else(|| self.data_dir.clone())?;
        Some(DataSource {
            dir,
            questions_file: self.questions_file().to_string(),
            profiles_file: self.profiles_file().to_string(),
            strict_coverage: self.strict_coverage(),
        })
    }

    /// Session idle TTL. Call [`validate_config`] first; an unparsable value
    /// falls back to the default here.
    pub fn session_ttl(&self) -> chrono::Duration {
        humantime::parse_duration(self.session_ttl_str())
            .ok()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .unwrap_or_else(|| chrono::Duration::minutes(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "data_dir: /srv/popa\nsession_ttl: 1h\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.data_dir(), Some(Path::new("/srv/popa")));
        assert_eq!(config.session_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "data_dir: [unclosed\n").unwrap();

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_data_source_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            strict_coverage: Some(false),
            ..Config::default()
        };
        let source = config.data_source(None).unwrap();
        assert_eq!(source.dir, PathBuf::from("/from/config"));
        assert!(!source.strict_coverage);

        let source = config.data_source(Some(PathBuf::from("/from/cli"))).unwrap();
        assert_eq!(source.dir, PathBuf::from("/from/cli"));
        assert_eq!(source.questions_path(), PathBuf::from("/from/cli/questions.csv"));
    }

    #[test]
    fn test_no_data_dir_means_builtin_tables() {
        let config = Config::default();
        assert_eq!(config.data_source(None), None);

        let source = config.data_source(Some(PathBuf::from("data"))).unwrap();
        assert_eq!(source.profiles_path(), PathBuf::from("data/pillars.csv"));
    }

    #[test]
    fn test_default_session_ttl() {
        assert_eq!(Config::default().session_ttl(), chrono::Duration::minutes(30));
    }
}
