//! Shared type definitions for the sandbox-prep crate
//!
//! These records travel between the upstream transpile step, the
//! orchestrator and the host page, so they serialize in the camelCase shape
//! the host expects.

use serde::{Deserialize, Serialize};

/// One learner file moving through the preparation pipeline.
///
/// Starts as `{ name, content }`, gains `compiled` from the transpile step and
/// ends with exactly one of `sandboxed` or `error` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxFile {
    pub name: String,
    /// Source as the learner wrote it. Error frames are rendered from this text.
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub main: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled: Option<CompiledCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandboxed: Option<SandboxedCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SandboxFileError>,
}

impl SandboxFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compiled_js(mut self, js: impl Into<String>) -> Self {
        self.compiled.get_or_insert_with(CompiledCode::default).js = Some(js.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: SandboxFileError) -> Self {
        self.error = Some(error);
        self
    }

    /// JavaScript produced upstream, or the empty string when there is none.
    pub fn compiled_js(&self) -> &str {
        self.compiled
            .as_ref()
            .and_then(|compiled| compiled.js.as_deref())
            .unwrap_or_default()
    }

    /// Imports followed by the body: the script the sandbox executes.
    pub fn assembled(&self) -> Option<String> {
        self.sandboxed.as_ref().map(|sandboxed| {
            if sandboxed.imports.is_empty() {
                sandboxed.code_without_imports.clone()
            } else {
                format!("{}\n{}", sandboxed.imports, sandboxed.code_without_imports)
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esjs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
}

/// Final, executable shape of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxedCode {
    pub imports: String,
    pub code_without_imports: String,
}

/// Error attached to a file, with a 1-based position into its content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxFileError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub stack: String,
}
