//! Turns top-level function declarations into exported declarations so
//! sibling files can import them by name.

use log::trace;
use swc_core::ecma::{
    ast::{Decl, ExportDecl, ModuleDecl, ModuleItem, Stmt},
    visit::{VisitMut, VisitMutWith},
};

use super::Transformer;
use crate::{error::TransformError, parser::parse_module};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportFunctionsTransformer;

impl Transformer for ExportFunctionsTransformer {
    fn name(&self) -> &'static str {
        "export-functions"
    }

    fn transform(&self, code: &str) -> Result<String, TransformError> {
        let mut parsed = parse_module(code)?;
        parsed.module.visit_mut_with(&mut ExportTopLevelFunctions);
        parsed.print()
    }
}

/// Only module items are rewritten; nested functions live in `Vec<Stmt>`
/// bodies and are never reached.
struct ExportTopLevelFunctions;

impl VisitMut for ExportTopLevelFunctions {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        *items = std::mem::take(items)
            .into_iter()
            .map(|item| match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Fn(fn_decl))) => {
                    trace!("Exporting function {}", fn_decl.ident.sym);
                    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                        span: fn_decl.function.span,
                        decl: Decl::Fn(fn_decl),
                    }))
                }
                other => other,
            })
            .collect();
    }
}
