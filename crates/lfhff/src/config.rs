use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::lookup::{LookupOptions, DEFAULT_MAX_RECORD_LEN};

pub const ENV_HOSTS_FILE: &str = "LFHFF_HOSTS_FILE";
pub const ENV_MAX_RECORD_LEN: &str = "LFHFF_MAX_RECORD_LEN";
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Effective lookup configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub hosts_file: PathBuf,
    pub max_record_len: usize,
}

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    hosts: Option<HostsSection>,
    lookup: Option<LookupSection>,
}

#[derive(Debug, Deserialize)]
struct HostsSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct LookupSection {
    max_record_len: Option<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            hosts_file: PathBuf::from(DEFAULT_HOSTS_FILE),
            max_record_len: DEFAULT_MAX_RECORD_LEN,
        }
    }
}

impl LookupConfig {
    /// Load configuration with precedence: CLI > env > file > defaults
    pub fn load(
        config_path: Option<&Path>,
        cli_hosts_file: Option<&Path>,
        cli_max_record_len: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let file_config = Self::load_from_file(config_path)?.unwrap_or_default();

        let hosts_file = cli_hosts_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_HOSTS_FILE).map(PathBuf::from))
            .or_else(|| file_config.hosts.and_then(|h| h.path))
            .map(Self::expand_tilde)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOSTS_FILE));

        let env_max_record_len = match std::env::var(ENV_MAX_RECORD_LEN) {
            Ok(value) => Some(value.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: ENV_MAX_RECORD_LEN,
                    message: format!("'{}': {}", value, e),
                }
            })?),
            Err(_) => None,
        };

        let max_record_len = cli_max_record_len
            .or(env_max_record_len)
            .or_else(|| file_config.lookup.and_then(|l| l.max_record_len))
            .unwrap_or(DEFAULT_MAX_RECORD_LEN);

        if max_record_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_record_len",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            hosts_file,
            max_record_len,
        })
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            max_record_len: self.max_record_len,
        }
    }

    fn load_from_file(path: Option<&Path>) -> Result<Option<ConfigFile>, ConfigError> {
        let config_path = match path {
            Some(p) => Self::expand_tilde(p.to_path_buf()),
            None => match Self::default_config_path() {
                Some(default) if default.exists() => default,
                _ => return Ok(None),
            },
        };

        if !config_path.exists() {
            // Explicitly specified path must exist
            return Err(ConfigError::NotFound(config_path));
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.clone(),
                source,
            })?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(Some(config))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lfhff").join("config.toml"))
    }

    fn expand_tilde(path: PathBuf) -> PathBuf {
        if let Some(path_str) = path.to_str() {
            if let Some(stripped) = path_str.strip_prefix("~/") {
                if let Some(home) = dirs::home_dir() {
                    return home.join(stripped);
                }
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Restores an environment variable to its original state on drop.
    struct EnvGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let original = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self { key, original }
        }

        fn remove(key: &'static str) -> Self {
            let original = std::env::var(key).ok();
            std::env::remove_var(key);
            Self { key, original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let _g1 = EnvGuard::remove(ENV_HOSTS_FILE);
        let _g2 = EnvGuard::remove(ENV_MAX_RECORD_LEN);
        let empty = config_file("");

        let config = LookupConfig::load(Some(empty.path()), None, None).unwrap();
        assert_eq!(config, LookupConfig::default());
        assert_eq!(config.lookup_options().max_record_len, 255);
    }

    #[test]
    #[serial]
    fn test_load_from_config_file() {
        let _g1 = EnvGuard::remove(ENV_HOSTS_FILE);
        let _g2 = EnvGuard::remove(ENV_MAX_RECORD_LEN);
        let file = config_file(
            r#"
[hosts]
path = "/srv/hosts/blocklist"

[lookup]
max_record_len = 1024
"#,
        );

        let config = LookupConfig::load(Some(file.path()), None, None).unwrap();
        assert_eq!(config.hosts_file, PathBuf::from("/srv/hosts/blocklist"));
        assert_eq!(config.max_record_len, 1024);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let _g1 = EnvGuard::set(ENV_HOSTS_FILE, "/env/hosts");
        let _g2 = EnvGuard::set(ENV_MAX_RECORD_LEN, "512");
        let file = config_file(
            r#"
[hosts]
path = "/file/hosts"

[lookup]
max_record_len = 1024
"#,
        );

        let config = LookupConfig::load(Some(file.path()), None, None).unwrap();
        assert_eq!(config.hosts_file, PathBuf::from("/env/hosts"));
        assert_eq!(config.max_record_len, 512);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        let _g1 = EnvGuard::set(ENV_HOSTS_FILE, "/env/hosts");
        let _g2 = EnvGuard::set(ENV_MAX_RECORD_LEN, "512");
        let empty = config_file("");

        let config = LookupConfig::load(
            Some(empty.path()),
            Some(Path::new("/cli/hosts")),
            Some(2048),
        )
        .unwrap();
        assert_eq!(config.hosts_file, PathBuf::from("/cli/hosts"));
        assert_eq!(config.max_record_len, 2048);
    }

    #[test]
    #[serial]
    fn test_invalid_env_value() {
        let _g1 = EnvGuard::remove(ENV_HOSTS_FILE);
        let _g2 = EnvGuard::set(ENV_MAX_RECORD_LEN, "lots");
        let empty = config_file("");

        let result = LookupConfig::load(Some(empty.path()), None, None);
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, ENV_MAX_RECORD_LEN),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_zero_max_record_len_rejected() {
        let _g1 = EnvGuard::remove(ENV_HOSTS_FILE);
        let _g2 = EnvGuard::remove(ENV_MAX_RECORD_LEN);
        let empty = config_file("");

        let result = LookupConfig::load(Some(empty.path()), None, Some(0));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "max_record_len",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = LookupConfig::load(Some(Path::new("/nonexistent/lfhff.toml")), None, None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_malformed_config_file() {
        let file = config_file("[lookup]\nmax_record_len = \"many\"\n");
        let result = LookupConfig::load(Some(file.path()), None, None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_tilde_expansion() {
        let home = dirs::home_dir().expect("home dir should exist");
        let expanded = LookupConfig::expand_tilde(PathBuf::from("~/hosts/sorted"));
        assert_eq!(expanded, home.join("hosts/sorted"));

        let unchanged = LookupConfig::expand_tilde(PathBuf::from("/etc/hosts"));
        assert_eq!(unchanged, PathBuf::from("/etc/hosts"));
    }
}
