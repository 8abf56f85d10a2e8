//! Preparation pipeline for learner code that runs inside a sandboxed preview.
//!
//! Source files arrive already transpiled to JavaScript. Each file is pushed
//! through an ordered chain of source-to-source transformers, its imports are
//! split off and unified, and the entry file's exported functions are wired
//! into every sibling file. A batch either yields one record per file or a
//! single synthetic file that renders the first error inside the sandbox.

pub mod code_frame;
pub mod config;
pub mod error;
pub mod error_report;
pub mod host;
pub mod import_handling;
pub mod orchestrator;
mod parser;
pub mod transformers;
pub mod transpile;
pub mod types;
pub mod visitors;

pub use config::{ProcessSandboxedCodeOptions, SandboxConfig};
pub use error::{ConfigError, ProcessError, TransformError};
pub use orchestrator::{SandboxOutcome, process_and_deliver, process_sandboxed_files};
pub use transformers::{Pipeline, process_sandboxed_code};
pub use types::{CompiledCode, SandboxFile, SandboxFileError, SandboxedCode};
