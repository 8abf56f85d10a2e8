//! Export collection visitor for ES modules
//!
//! Finds the functions a module exports through `export function name()`
//! declarations at the top level. Re-exports, export lists and default
//! exports are not collected.

use swc_core::ecma::{
    ast::{Decl, ExportDecl, Module, ModuleDecl, ModuleItem},
    visit::{Visit, VisitWith},
};

/// Visitor that collects exported function declarations
#[derive(Debug, Default)]
pub struct ExportCollector {
    exported_functions: Vec<String>,
}

impl ExportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exported function names in declaration order.
    pub fn analyze(module: &Module) -> Vec<String> {
        let mut collector = Self::new();
        module.visit_with(&mut collector);
        collector.exported_functions
    }
}

impl Visit for ExportCollector {
    fn visit_module_items(&mut self, items: &[ModuleItem]) {
        for item in items {
            if let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Fn(fn_decl),
                ..
            })) = item
            {
                self.exported_functions.push(fn_decl.ident.sym.to_string());
            }
        }
    }
}
