use log::trace;
use swc_core::ecma::ast::{Expr, ModuleItem, Stmt};

use super::Transformer;
use crate::{error::TransformError, parser::parse_module};

/// Drops `await ...;` statements at module level, for runtimes that evaluate
/// the body as a classic script.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveTopLevelAwaitsTransformer;

impl Transformer for RemoveTopLevelAwaitsTransformer {
    fn name(&self) -> &'static str {
        "remove-top-level-awaits"
    }

    fn transform(&self, code: &str) -> Result<String, TransformError> {
        let mut parsed = parse_module(code)?;
        parsed.module.body.retain(|item| {
            let is_await = matches!(
                item,
                ModuleItem::Stmt(Stmt::Expr(expr_stmt)) if matches!(*expr_stmt.expr, Expr::Await(_))
            );
            if is_await {
                trace!("Dropping top-level await statement");
            }
            !is_await
        });
        parsed.print()
    }
}
