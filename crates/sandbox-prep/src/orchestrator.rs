//! Batch orchestration
//!
//! Processes one batch of files: the entry file first, with its functions
//! exported, then every sibling in input order with imports generated from
//! the entry's exports. Processing is fail-fast: the first failing file ends
//! the batch and becomes the only output, rendered by
//! [`crate::error_report::print_error`].
//!
//! ```text
//! Start ──► ProcessingEntry ──► ProcessingOthers ──► Done
//!   │              │                    │
//!   └──────────────┴────────► Failed ◄──┘
//! ```

use anyhow::Result;
use log::{debug, info, warn};

use crate::{
    config::SandboxConfig,
    error::ProcessError,
    error_report::print_error,
    host::{HostChannel, HostMessage},
    import_handling::{generate_import_functions, split_code_imports, unify_imports},
    transformers::Pipeline,
    types::{SandboxFile, SandboxFileError, SandboxedCode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Start,
    ProcessingEntry,
    ProcessingOthers,
    Failed,
    Done,
}

/// Result of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxOutcome {
    /// Entry file first, then the siblings in input order.
    Done(Vec<SandboxFile>),
    /// The first file that failed, with its `error` set.
    Failed(Box<SandboxFile>),
}

impl SandboxOutcome {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&SandboxFileError> {
        match self {
            Self::Done(_) => None,
            Self::Failed(file) => file.error.as_ref(),
        }
    }

    /// Files to hand to the sandbox: the prepared batch, or the single
    /// error-display file.
    pub fn into_files(self) -> Vec<SandboxFile> {
        match self {
            Self::Done(files) => files,
            Self::Failed(file) => vec![print_error(&file)],
        }
    }
}

/// Drives one batch through the state machine.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    config: &'a SandboxConfig,
    state: BatchState,
}

impl<'a> Orchestrator<'a> {
    pub const fn new(config: &'a SandboxConfig) -> Self {
        Self {
            config,
            state: BatchState::Start,
        }
    }

    pub const fn state(&self) -> BatchState {
        self.state
    }

    fn transition(&mut self, next: BatchState) {
        debug!("Batch state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, file: &SandboxFile, error: SandboxFileError) -> SandboxOutcome {
        warn!(
            "Batch failed in {} at {}:{}: {}",
            file.name, error.line, error.column, error.message
        );
        self.transition(BatchState::Failed);
        SandboxOutcome::Failed(Box::new(file.clone().with_error(error)))
    }

    pub fn run(&mut self, files: &[SandboxFile]) -> SandboxOutcome {
        info!("Preparing {} file(s) for the sandbox", files.len());

        // Errors from upstream (e.g. the transpiler) win before any work.
        if let Some(file) = files.iter().find(|file| file.error.is_some()) {
            let error = file.error.clone().unwrap_or_default();
            return self.fail(file, error);
        }

        self.transition(BatchState::ProcessingEntry);
        let entry_index = files.iter().position(|file| self.is_entry(file));
        let entry = entry_index.map_or_else(
            || {
                warn!("No entry file named {:?} in batch", self.config.entry_file);
                SandboxFile::new(self.config.entry_file.as_str(), "")
            },
            |index| files[index].clone(),
        );

        let entry_code = match self.prepare_main_file(&entry) {
            Ok(sandboxed) => sandboxed,
            Err(error) => return self.fail(&entry, error.to_file_error()),
        };

        self.transition(BatchState::ProcessingOthers);
        let mut prepared = Vec::with_capacity(files.len().max(1));
        for (index, file) in files.iter().enumerate() {
            if Some(index) == entry_index {
                continue;
            }
            match self.prepare_other_file(file, &entry.name, &entry_code) {
                Ok(sandboxed) => prepared.push(SandboxFile {
                    sandboxed: Some(sandboxed),
                    ..file.clone()
                }),
                Err(error) => return self.fail(file, error.to_file_error()),
            }
        }

        prepared.insert(
            0,
            SandboxFile {
                sandboxed: Some(entry_code),
                ..entry
            },
        );
        self.transition(BatchState::Done);
        info!("Prepared {} file(s)", prepared.len());
        SandboxOutcome::Done(prepared)
    }

    fn is_entry(&self, file: &SandboxFile) -> bool {
        file.main || file.name == self.config.entry_file
    }

    fn pipeline_for(&self, export_functions: bool) -> Pipeline {
        let options = self.config.options.with_export_functions(export_functions);
        Pipeline::with_loop_timeout(&options, self.config.loop_timeout_ms)
    }

    fn uses_terminal(&self, body: &str) -> bool {
        body.contains(self.config.terminal_keyword.as_str())
    }

    fn prepare_main_file(&self, file: &SandboxFile) -> Result<SandboxedCode, ProcessError> {
        debug!("Preparing entry file {}", file.name);
        // Siblings can only import what the entry exports.
        let code = self
            .pipeline_for(true)
            .run(file.compiled_js())
            .map_err(|error| ProcessError::new(file.name.as_str(), &error))?;

        let split = split_code_imports(&code);
        let terminal = self.uses_terminal(&split.code_without_imports);
        let imports = unify_imports(&join_imports([
            terminal.then_some(self.config.terminal_import.as_str()),
            Some(self.config.tests_import.as_str()),
            Some(split.imports.as_str()),
        ]));

        Ok(SandboxedCode {
            imports,
            code_without_imports: split.code_without_imports,
        })
    }

    fn prepare_other_file(
        &self,
        file: &SandboxFile,
        entry_name: &str,
        entry: &SandboxedCode,
    ) -> Result<SandboxedCode, ProcessError> {
        debug!("Preparing file {}", file.name);
        let to_process_error = |error| ProcessError::new(file.name.as_str(), &error);

        let imports_from_main =
            generate_import_functions(&entry.code_without_imports, &format!("./{entry_name}"))
                .map_err(to_process_error)?;

        let code = self
            .pipeline_for(self.config.options.export_functions)
            .run(file.compiled_js())
            .map_err(to_process_error)?;

        let split = split_code_imports(&code);
        let is_tests_file = file.name == self.config.tests_file;
        let terminal = self.uses_terminal(&split.code_without_imports);
        let imports = unify_imports(&join_imports([
            Some(imports_from_main.as_str()),
            Some(split.imports.as_str()),
            is_tests_file.then_some(self.config.tests_import.as_str()),
            terminal.then_some(self.config.terminal_import.as_str()),
        ]));

        Ok(SandboxedCode {
            imports,
            code_without_imports: split.code_without_imports,
        })
    }
}

fn join_imports<'s>(parts: impl IntoIterator<Item = Option<&'s str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prepare a batch with `config`.
pub fn process_sandboxed_files(files: &[SandboxFile], config: &SandboxConfig) -> SandboxOutcome {
    Orchestrator::new(config).run(files)
}

/// Prepare a batch and announce it to the host on success.
///
/// Returns the files the sandbox should run; on failure that is the single
/// error-display file and nothing is posted.
pub fn process_and_deliver(
    files: &[SandboxFile],
    config: &SandboxConfig,
    channel: &mut dyn HostChannel,
) -> Result<Vec<SandboxFile>> {
    match process_sandboxed_files(files, config) {
        SandboxOutcome::Done(prepared) => {
            channel.post_message(&HostMessage::files_compiled(prepared.clone()))?;
            Ok(prepared)
        }
        failed @ SandboxOutcome::Failed(_) => Ok(failed.into_files()),
    }
}
