//! Error types for the preparation pipeline
//!
//! Failures are layered the same way processing is:
//! - [`TransformError`] comes out of a single transformer (or the pipeline)
//! - [`ProcessError`] ties a transform failure to the file being processed
//! - a failed batch is reported through [`crate::orchestrator::SandboxOutcome::Failed`]

use std::path::PathBuf;

use thiserror::Error;

use crate::types::SandboxFileError;

/// Failure raised while transforming one piece of source text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The code is not valid in the target dialect.
    #[error("{message} ({line}:{column})")]
    Syntax {
        message: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// The transformed AST could not be printed back to text.
    #[error("failed to print transformed code: {0}")]
    Emit(String),
}

impl TransformError {
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            line: line.max(1),
            column: column.max(1),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Syntax { message, .. } => message.clone(),
            Self::Emit(message) => message.clone(),
        }
    }

    /// Line of the failure; printing failures have no position and report 1.
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. } => *line,
            Self::Emit(_) => 1,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::Syntax { column, .. } => *column,
            Self::Emit(_) => 1,
        }
    }
}

/// A transform failure attributed to a specific file of the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{file_name}:{line}:{column}: {message}")]
pub struct ProcessError {
    pub file_name: String,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ProcessError {
    pub fn new(file_name: impl Into<String>, error: &TransformError) -> Self {
        Self {
            file_name: file_name.into(),
            message: error.message(),
            line: error.line(),
            column: error.column(),
        }
    }

    /// Stack text in the shape the sandbox runtime prints for a thrown error.
    pub fn stack(&self) -> String {
        format!(
            "SyntaxError: {}\n    at {}:{}:{}",
            self.message, self.file_name, self.line, self.column
        )
    }

    pub fn to_file_error(&self) -> SandboxFileError {
        SandboxFileError {
            message: self.message.clone(),
            line: self.line,
            column: self.column,
            stack: self.stack(),
        }
    }
}

/// Failure while loading a [`crate::config::SandboxConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
