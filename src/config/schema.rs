use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_QUESTIONS_FILE: &str = "questions.csv";
pub const DEFAULT_PROFILES_FILE: &str = "pillars.csv";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_SESSION_TTL: &str = "30m";

/// Application configuration.
///
/// Every field is optional; the accessors fill in defaults.
///
/// Example YAML:
/// ```yaml
/// data_dir: /usr/share/popa
/// questions_file: questions.csv
/// profiles_file: pillars.csv
/// export_dir: ~/Documents
/// session_ttl: 30m
/// strict_coverage: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the question and profile tables. When unset, the
    /// tables compiled into the binary are used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub questions_file: Option<String>,

    #[serde(default)]
    pub profiles_file: Option<String>,

    /// Where CSV exports are written
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Idle time after which a session and its history are dropped
    /// (humantime format, e.g. "30m", "2h")
    #[serde(default)]
    pub session_ttl: Option<String>,

    /// Reject question banks that leave a dimension without questions
    #[serde(default)]
    pub strict_coverage: Option<bool>,
}

impl Config {
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn questions_file(&self) -> &str {
        self.questions_file.as_deref().unwrap_or(DEFAULT_QUESTIONS_FILE)
    }

    pub fn profiles_file(&self) -> &str {
        self.profiles_file.as_deref().unwrap_or(DEFAULT_PROFILES_FILE)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
    }

    pub fn session_ttl_str(&self) -> &str {
        self.session_ttl.as_deref().unwrap_or(DEFAULT_SESSION_TTL)
    }

    pub fn strict_coverage(&self) -> bool {
        self.strict_coverage.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_accessors() {
        let config = Config::default();
        assert_eq!(config.data_dir(), None);
        assert_eq!(config.questions_file(), "questions.csv");
        assert_eq!(config.profiles_file(), "pillars.csv");
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert_eq!(config.session_ttl_str(), "30m");
        assert!(config.strict_coverage());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/popa")),
            session_ttl: Some("2h".to_string()),
            strict_coverage: Some(false),
            ..Config::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
data_dir: /opt/popa/data
export_dir: /tmp/exports
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir(), Some(Path::new("/opt/popa/data")));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.questions_file(), "questions.csv");
        assert!(config.session_ttl.is_none());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("colour: blue\n");
        assert!(result.is_err());
    }
}
