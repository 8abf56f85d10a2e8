//! Thin wrapper over the swc parser and code generator.
//!
//! Every transformer that needs an AST goes through [`parse_module`], which
//! turns parser diagnostics into [`TransformError::Syntax`] with 1-based
//! positions, and prints its result back with [`ParsedModule::print`].

use swc_core::{
    common::{
        BytePos, FileName, SourceFile, SourceMap, Span, Spanned,
        comments::{Comments, SingleThreadedComments},
        sync::Lrc,
    },
    ecma::{
        ast::{EsVersion, Module},
        codegen::{Config as CodegenConfig, Emitter, text_writer::JsWriter},
        parser::{Parser, StringInput, Syntax, error::Error as ParseError, lexer::Lexer},
    },
};

use crate::error::TransformError;

/// A parsed ES module together with the source map and comments it was
/// parsed with, so it can be printed back faithfully.
pub(crate) struct ParsedModule {
    source_map: Lrc<SourceMap>,
    file: Lrc<SourceFile>,
    comments: SingleThreadedComments,
    pub(crate) module: Module,
}

impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedModule")
            .field("items", &self.module.body.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn parse_module(code: &str) -> Result<ParsedModule, TransformError> {
    let source_map: Lrc<SourceMap> = Lrc::default();
    let file = source_map.new_source_file(FileName::Anon.into(), code.to_owned());
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::EsNext,
        StringInput::from(&*file),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|error| syntax_error(&source_map, &error))?;

    // Recoverable diagnostics still mean the input is invalid.
    if let Some(error) = parser.take_errors().into_iter().next() {
        return Err(syntax_error(&source_map, &error));
    }

    Ok(ParsedModule {
        source_map,
        file,
        comments,
        module,
    })
}

fn syntax_error(source_map: &SourceMap, error: &ParseError) -> TransformError {
    let span = error.span();
    let message = error.kind().msg().into_owned();
    if span.is_dummy() {
        return TransformError::syntax(message, 1, 1);
    }
    let loc = source_map.lookup_char_pos(span.lo);
    TransformError::syntax(message, loc.line, loc.col.0 + 1)
}

impl ParsedModule {
    /// Byte offset of `pos` inside the parsed text.
    pub(crate) fn offset_of(&self, pos: BytePos) -> usize {
        (pos.0 - self.file.start_pos.0) as usize
    }

    /// Byte range of `span` inside the parsed text.
    pub(crate) fn range_of(&self, span: Span) -> (usize, usize) {
        (self.offset_of(span.lo), self.offset_of(span.hi))
    }

    pub(crate) fn print(&self) -> Result<String, TransformError> {
        let mut buffer = Vec::new();
        {
            let comments: &dyn Comments = &self.comments;
            let writer = JsWriter::new(self.source_map.clone(), "\n", &mut buffer, None);
            let mut emitter = Emitter {
                cfg: CodegenConfig::default(),
                cm: self.source_map.clone(),
                comments: Some(comments),
                wr: writer,
            };
            emitter
                .emit_module(&self.module)
                .map_err(|error| TransformError::Emit(error.to_string()))?;
        }
        String::from_utf8(buffer).map_err(|error| TransformError::Emit(error.to_string()))
    }
}
