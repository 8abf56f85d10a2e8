use super::Transformer;
use crate::{error::TransformError, parser::parse_module};

/// Reprints code in canonical style.
///
/// Parsing is the syntax gate of the pipeline: every later transformer may
/// assume its input parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatTransformer;

impl Transformer for FormatTransformer {
    fn name(&self) -> &'static str {
        "format"
    }

    fn transform(&self, code: &str) -> Result<String, TransformError> {
        parse_module(code)?.print()
    }
}
