//! Runtime configuration.
//!
//! The library is driven through `libcall()`, so there is no command line to
//! carry options. Configuration comes from, later sources winning:
//!
//! 1. built-in defaults;
//! 2. the JSON file named by `CLANG_VIM_CONFIG`;
//! 3. `CLANG_VIM_DEFAULT_FLAGS`, a whitespace separated flag list.
//!
//! The result is loaded once per process, see [`Config::global`].

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "CLANG_VIM_CONFIG";

/// Environment variable overriding [`Config::default_flags`].
pub const DEFAULT_FLAGS_ENV: &str = "CLANG_VIM_DEFAULT_FLAGS";

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flags used when neither the request nor a compilation database
    /// provides any.
    pub default_flags: Vec<String>,
    /// Look up `compile_commands.json` for requests without flags.
    pub compile_database: bool,
    /// File name of the compilation database.
    pub database_file_name: String,
    /// Let libclang print diagnostics to stderr while parsing.
    pub display_diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_flags: vec!["-std=c++1y".to_string()],
            compile_database: true,
            database_file_name: "compile_commands.json".to_string(),
            display_diagnostics: false,
        }
    }
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// ## Errors
    /// Returns an error if the file named by `CLANG_VIM_CONFIG` cannot be
    /// read or is not valid JSON.
    pub fn load() -> Result<Self> {
        let file = std::env::var_os(CONFIG_ENV);
        let flags = std::env::var(DEFAULT_FLAGS_ENV).ok();
        Self::from_sources(file.as_deref().map(Path::new), flags.as_deref())
    }

    /// Merges defaults, an optional JSON file and an optional flag override.
    ///
    /// ## Errors
    /// Returns an error if `file` cannot be read or parsed.
    pub fn from_sources(file: Option<&Path>, default_flags: Option<&str>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(flags) = default_flags {
            config.default_flags = flags.split_whitespace().map(str::to_string).collect();
        }
        Ok(config)
    }

    /// Reads a JSON configuration file. Missing fields keep their defaults.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid JSON in {}: {e}", path.display())))
    }

    /// The process-wide configuration, loaded on first use.
    ///
    /// A configuration that fails to load is logged and replaced by the
    /// defaults; the editor contract has no way to report it.
    pub fn global() -> &'static Config {
        static CONFIG: OnceLock<Config> = OnceLock::new();
        CONFIG.get_or_init(|| match Self::load() {
            Ok(config) => {
                debug!(?config, "configuration loaded");
                config
            }
            Err(e) => {
                warn!(error = %e, "failed to load configuration, using defaults");
                Self::default()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_flags, vec!["-std=c++1y"]);
        assert!(config.compile_database);
        assert_eq!(config.database_file_name, "compile_commands.json");
        assert!(!config.display_diagnostics);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clang-vim.json");
        fs::write(&path, r#"{ "compile_database": false }"#).unwrap();

        let config = Config::from_sources(Some(&path), None).unwrap();
        assert!(!config.compile_database);
        assert_eq!(config.default_flags, vec!["-std=c++1y"]);
    }

    #[test]
    fn test_env_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clang-vim.json");
        fs::write(&path, r#"{ "default_flags": ["-std=c++11"] }"#).unwrap();

        let config = Config::from_sources(Some(&path), Some("-std=c++17  -Wall")).unwrap();
        assert_eq!(config.default_flags, vec!["-std=c++17", "-Wall"]);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    #[serial]
    fn test_load_reads_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clang-vim.json");
        fs::write(&path, r#"{ "database_file_name": "db.json" }"#).unwrap();

        // SAFETY: serialized with every other test touching the environment.
        unsafe {
            std::env::set_var(CONFIG_ENV, &path);
            std::env::set_var(DEFAULT_FLAGS_ENV, "-x c++");
        }
        let config = Config::load();
        // SAFETY: as above.
        unsafe {
            std::env::remove_var(CONFIG_ENV);
            std::env::remove_var(DEFAULT_FLAGS_ENV);
        }

        let config = config.unwrap();
        assert_eq!(config.database_file_name, "db.json");
        assert_eq!(config.default_flags, vec!["-x", "c++"]);
    }
}
