//! Configuration for the preparation pipeline
//!
//! [`ProcessSandboxedCodeOptions`] picks the transformers that run on each
//! file. [`SandboxConfig`] adds the fixed names and helper imports of the file
//! set and can be loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the entry file every sibling imports from.
pub const MAIN_FILE: &str = "main";

/// Name of the file that receives the test-assertion helper.
pub const MAIN_TESTS_FILE: &str = "main.test";

pub const DEFAULT_LOOP_TIMEOUT_MS: u64 = 5000;

/// Literal text that marks a file as using the terminal helper.
pub const TERMINAL_KEYWORD: &str = "Terminal";

pub const IMPORT_ESJS_TERMINAL: &str = "import { Terminal } from '@es-js/terminal'";

pub const IMPORT_ESJS_PRUEBA: &str = "import { prueba } from '@es-js/prueba'";

/// Selects which transformers run on a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessSandboxedCodeOptions {
    /// Format before any other transformer, on top of the final format pass.
    #[serde(alias = "pre-format")]
    pub pre_format: bool,
    #[serde(alias = "export-functions")]
    pub export_functions: bool,
    #[serde(alias = "infinite-loop-protection")]
    pub infinite_loop_protection: bool,
    #[serde(alias = "remove-top-level-awaits")]
    pub remove_top_level_awaits: bool,
}

impl ProcessSandboxedCodeOptions {
    #[must_use]
    pub const fn with_export_functions(mut self, enabled: bool) -> Self {
        self.export_functions = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SandboxConfig {
    pub entry_file: String,
    pub tests_file: String,
    pub loop_timeout_ms: u64,
    pub terminal_keyword: String,
    pub terminal_import: String,
    pub tests_import: String,
    pub options: ProcessSandboxedCodeOptions,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            entry_file: MAIN_FILE.to_owned(),
            tests_file: MAIN_TESTS_FILE.to_owned(),
            loop_timeout_ms: DEFAULT_LOOP_TIMEOUT_MS,
            terminal_keyword: TERMINAL_KEYWORD.to_owned(),
            terminal_import: IMPORT_ESJS_TERMINAL.to_owned(),
            tests_import: IMPORT_ESJS_PRUEBA.to_owned(),
            options: ProcessSandboxedCodeOptions::default(),
        }
    }
}

impl SandboxConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("Loaded sandbox config from {path:?}: {config:?}");
        Ok(config)
    }

    #[must_use]
    pub const fn with_options(mut self, options: ProcessSandboxedCodeOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SandboxConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, SandboxConfig::default());
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = SandboxConfig::from_toml_str(
            r#"
entry-file = "principal"
loop-timeout-ms = 250

[options]
infinite-loop-protection = true
exportFunctions = true
"#,
        )
        .expect("config should parse");

        assert_eq!(config.entry_file, "principal");
        assert_eq!(config.loop_timeout_ms, 250);
        assert_eq!(config.tests_file, MAIN_TESTS_FILE);
        assert!(config.options.infinite_loop_protection);
        assert!(config.options.export_functions);
        assert!(!config.options.pre_format);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let result = SandboxConfig::from_toml_str("loop-timeout-ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = SandboxConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sandbox.toml");
        std::fs::write(&path, "tests-file = \"pruebas\"\n").expect("write config");

        let config = SandboxConfig::load(&path).expect("config should load");
        assert_eq!(config.tests_file, "pruebas");
    }
}
