//! Source-to-source transformers and the pipeline that chains them
//!
//! A [`Transformer`] maps code text to code text and reports syntax failures
//! with their position. The [`Pipeline`] applies an ordered list of them and
//! stops at the first failure, so no partially transformed code escapes.

mod export_functions;
mod format;
mod loop_protection;
mod patches;
mod top_level_await;

use log::{debug, trace};

pub use export_functions::ExportFunctionsTransformer;
pub use format::FormatTransformer;
pub use loop_protection::{INFINITE_LOOP_HANDLER, InfiniteLoopProtectionTransformer, LOOP_VAR_PREFIX};
pub use patches::{Patch, apply_patches};
pub use top_level_await::RemoveTopLevelAwaitsTransformer;

use crate::{config::ProcessSandboxedCodeOptions, error::TransformError};

/// A pure text-to-text rewrite of one file's code.
pub trait Transformer: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn transform(&self, code: &str) -> Result<String, TransformError>;
}

/// Ordered list of transformers applied to one file.
#[derive(Debug, Default)]
pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    pub fn new(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self { transformers }
    }

    pub fn from_options(options: &ProcessSandboxedCodeOptions) -> Self {
        Self::with_loop_timeout(options, crate::config::DEFAULT_LOOP_TIMEOUT_MS)
    }

    /// Build the pipeline selected by `options`.
    ///
    /// The final format pass is always present so every file leaves the
    /// pipeline in the same printed style.
    pub fn with_loop_timeout(options: &ProcessSandboxedCodeOptions, timeout_ms: u64) -> Self {
        let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();
        if options.pre_format {
            transformers.push(Box::new(FormatTransformer));
        }
        if options.remove_top_level_awaits {
            transformers.push(Box::new(RemoveTopLevelAwaitsTransformer));
        }
        if options.export_functions {
            transformers.push(Box::new(ExportFunctionsTransformer));
        }
        if options.infinite_loop_protection {
            transformers.push(Box::new(InfiniteLoopProtectionTransformer::new(timeout_ms)));
        }
        transformers.push(Box::new(FormatTransformer));
        Self::new(transformers)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn run(&self, code: &str) -> Result<String, TransformError> {
        debug!("Running pipeline {:?}", self.names());
        self.transformers
            .iter()
            .try_fold(code.to_owned(), |code, transformer| {
                trace!("Applying {} to {} bytes", transformer.name(), code.len());
                transformer.transform(&code).inspect_err(|error| {
                    debug!("{} failed: {error}", transformer.name());
                })
            })
    }
}

/// Run the pipeline described by `options` with the default loop timeout.
pub fn process_sandboxed_code(
    code: &str,
    options: &ProcessSandboxedCodeOptions,
) -> Result<String, TransformError> {
    Pipeline::from_options(options).run(code)
}
