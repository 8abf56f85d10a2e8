//! Seam for the teaching-dialect transpiler.
//!
//! The transpiler itself lives outside this crate. [`compile_files`] runs it
//! over a batch and records either the produced JavaScript or the failure on
//! each file, which is the shape [`crate::orchestrator`] consumes.

use log::debug;

use crate::{
    error::{ProcessError, TransformError},
    types::{CompiledCode, SandboxFile},
};

pub trait Transpiler {
    fn transpile(&self, source: &str) -> Result<String, TransformError>;
}

impl<F> Transpiler for F
where
    F: Fn(&str) -> Result<String, TransformError>,
{
    fn transpile(&self, source: &str) -> Result<String, TransformError> {
        self(source)
    }
}

/// For sources already written in JavaScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranspiler;

impl Transpiler for PassthroughTranspiler {
    fn transpile(&self, source: &str) -> Result<String, TransformError> {
        Ok(source.to_owned())
    }
}

/// Transpile every file, attaching `compiled` on success and `error` on
/// failure. Failures do not stop the batch.
pub fn compile_files(files: Vec<SandboxFile>, transpiler: &dyn Transpiler) -> Vec<SandboxFile> {
    files
        .into_iter()
        .map(|mut file| {
            let mut source = file.content.clone();
            if !source.ends_with('\n') {
                source.push('\n');
            }

            match transpiler.transpile(&source) {
                Ok(js) => {
                    file.compiled = Some(CompiledCode {
                        esjs: Some(file.content.clone()),
                        js: Some(js),
                    });
                }
                Err(error) => {
                    debug!("Transpiling {} failed: {error}", file.name);
                    file.error = Some(ProcessError::new(file.name.as_str(), &error).to_file_error());
                }
            }
            file
        })
        .collect()
}
