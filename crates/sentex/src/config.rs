//! File and environment configuration for [`Options`].
//!
//! # Config file: `.sentex.toml`
//!
//! Hosts and the `sentex` binary look for `.sentex.toml` (or `sentex.toml`)
//! in the working directory and its ancestors:
//!
//! ```toml
//! max_source_length = 4096
//! max_ast_depth = 32
//! max_eval_operations = 50000
//! dangerous_keys = ["__proto__", "constructor", "prototype", "secret"]
//! reject_dangerous_keys = true
//! allow_global_identifiers = false
//! ```
//!
//! All fields are optional; missing ones keep the [`Options::default`]
//! values. `dangerous_keys = []` disables the dangerous-key check.
//!
//! # Environment
//!
//! `SENTEX_MAX_SOURCE_LENGTH`, `SENTEX_MAX_AST_DEPTH` and
//! `SENTEX_MAX_EVAL_OPERATIONS` override the file through
//! [`Config::apply_env`].

use anyhow::{Context, Result};
use sentex_syntax::Options;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched by [`Config::load`], in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".sentex.toml", "sentex.toml"];

/// TOML-friendly intermediate representation (all fields optional).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    max_source_length: Option<usize>,
    max_ast_depth: Option<usize>,
    max_eval_operations: Option<u64>,
    dangerous_keys: Option<Vec<String>>,
    reject_dangerous_keys: Option<bool>,
    allow_global_identifiers: Option<bool>,
}

/// Resolved configuration plus the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub options: Options,
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(toml_str).context("Failed to parse config")?;

        let mut options = Options::default();
        if let Some(max) = file.max_source_length {
            options = options.with_max_source_length(max);
        }
        if let Some(max) = file.max_ast_depth {
            options = options.with_max_ast_depth(max);
        }
        if let Some(max) = file.max_eval_operations {
            options = options.with_max_eval_operations(max);
        }
        if let Some(keys) = file.dangerous_keys {
            options = options.with_dangerous_keys(keys);
        }
        if let Some(reject) = file.reject_dangerous_keys {
            options = options.with_reject_dangerous_keys(reject);
        }
        if let Some(allow) = file.allow_global_identifiers {
            options = options.with_allow_global_identifiers(allow);
        }

        Ok(Self {
            options,
            path: None,
        })
    }

    /// Loads configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Searches `start_dir` and its ancestors for a config file.
    ///
    /// Returns `Config::default()` if none is found.
    pub fn load(start_dir: impl AsRef<Path>) -> Result<Self> {
        match Self::find_config(start_dir) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn find_config(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start_dir.as_ref().to_path_buf();
        if let Ok(abs) = dir.canonicalize() {
            dir = abs;
        }

        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Applies `SENTEX_MAX_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Applies `SENTEX_MAX_*` overrides read through `lookup`.
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(max) = parse_var(&lookup, "SENTEX_MAX_SOURCE_LENGTH")? {
            self.options = self.options.with_max_source_length(max);
        }
        if let Some(max) = parse_var(&lookup, "SENTEX_MAX_AST_DEPTH")? {
            self.options = self.options.with_max_ast_depth(max);
        }
        if let Some(max) = parse_var(&lookup, "SENTEX_MAX_EVAL_OPERATIONS")? {
            self.options = self.options.with_max_eval_operations(max);
        }
        Ok(self)
    }

    pub fn into_options(self) -> Options {
        self.options
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {name}: '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            max_source_length = 4096
            max_ast_depth = 32
            max_eval_operations = 500
            dangerous_keys = ["Secret"]
            reject_dangerous_keys = true
            allow_global_identifiers = true
        "#;
        let options = Config::from_toml_str(toml).unwrap().into_options();
        assert_eq!(options.max_source_length, Some(4096));
        assert_eq!(options.max_ast_depth, Some(32));
        assert_eq!(options.max_eval_operations, Some(500));
        assert!(options.is_dangerous_key("secret"));
        assert!(!options.is_dangerous_key("__proto__"));
        assert!(options.allow_global_identifiers);
    }

    #[test]
    fn test_parse_partial_config() {
        let options = Config::from_toml_str("max_ast_depth = 8").unwrap().into_options();
        assert_eq!(options.max_ast_depth, Some(8));
        assert_eq!(options.max_eval_operations, None);
        assert!(options.is_dangerous_key("constructor"));
    }

    #[test]
    fn test_empty_key_list_disables_check() {
        let options = Config::from_toml_str("dangerous_keys = []").unwrap().into_options();
        assert!(!options.is_dangerous_key("__proto__"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = Config::from_toml_str("max_depth = 3").unwrap_err();
        assert!(format!("{err:#}").contains("max_depth"), "{err:#}");
    }

    #[test]
    fn test_env_overrides() {
        let vars = |name: &str| match name {
            "SENTEX_MAX_AST_DEPTH" => Some(" 12 ".to_string()),
            "SENTEX_MAX_EVAL_OPERATIONS" => Some("99".to_string()),
            _ => None,
        };
        let cfg = Config::from_toml_str("max_ast_depth = 4\nmax_source_length = 10")
            .unwrap()
            .apply_vars(vars)
            .unwrap();
        assert_eq!(cfg.options.max_ast_depth, Some(12));
        assert_eq!(cfg.options.max_eval_operations, Some(99));
        assert_eq!(cfg.options.max_source_length, Some(10));
    }

    #[test]
    fn test_invalid_env_value() {
        let err = Config::new()
            .apply_vars(|name| (name == "SENTEX_MAX_AST_DEPTH").then(|| "deep".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for SENTEX_MAX_AST_DEPTH: 'deep'");
    }
}
