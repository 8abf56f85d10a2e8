//! Wall-clock guards for top-level loops.
//!
//! Each top-level `while`, `do-while`, `for`, `for-in` and `for-of` gets a
//! start timestamp right before it and a deadline check as the first
//! statement of its body. Once the deadline passes the sandbox's handler is
//! notified and the loop breaks.

use log::debug;
use swc_core::{
    common::Spanned,
    ecma::ast::{ModuleItem, Stmt},
};

use super::{Patch, Transformer, apply_patches};
use crate::{config::DEFAULT_LOOP_TIMEOUT_MS, error::TransformError, parser::parse_module};

pub const LOOP_VAR_PREFIX: &str = "_wmloopvar";

/// Global the sandbox page installs to report a runaway loop.
pub const INFINITE_LOOP_HANDLER: &str = "window._handleInfiniteLoopException";

#[derive(Debug, Clone, Copy)]
pub struct InfiniteLoopProtectionTransformer {
    timeout_ms: u64,
}

impl Default for InfiniteLoopProtectionTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_LOOP_TIMEOUT_MS)
    }
}

impl InfiniteLoopProtectionTransformer {
    pub const fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Insertions for every guarded loop, as offsets into `code`.
    ///
    /// The loop counter starts at 1 on every call.
    pub fn collect_patches(&self, code: &str) -> Result<Vec<Patch>, TransformError> {
        let parsed = parse_module(code)?;
        let mut patches = Vec::new();
        let mut loop_id = 1usize;

        for item in &parsed.module.body {
            let ModuleItem::Stmt(stmt) = item else {
                continue;
            };
            let Some(body) = loop_body(stmt) else {
                continue;
            };

            let var_name = format!("{LOOP_VAR_PREFIX}{loop_id}");
            let check = format!(
                "\nif (Date.now() - {var_name} > {}) {{ {INFINITE_LOOP_HANDLER}(new Error(\"Bucle infinito\")); break;}}\n",
                self.timeout_ms
            );
            let (body_start, body_end) = parsed.range_of(body.span());

            if matches!(body, Stmt::Block(_)) {
                patches.push(Patch::new(body_start + 1, check));
            } else {
                // `while (x) step()` becomes `while (x) {<check>step()}`
                patches.push(Patch::new(body_start, format!("{{{check}")));
                patches.push(Patch::new(body_end, "}"));
            }
            patches.push(Patch::new(
                parsed.offset_of(stmt.span().lo),
                format!("var {var_name} = Date.now();\n"),
            ));
            loop_id += 1;
        }

        debug!("Guarding {} top-level loop(s)", loop_id - 1);
        Ok(patches)
    }
}

fn loop_body(stmt: &Stmt) -> Option<&Stmt> {
    match stmt {
        Stmt::While(node) => Some(&*node.body),
        Stmt::DoWhile(node) => Some(&*node.body),
        Stmt::For(node) => Some(&*node.body),
        Stmt::ForIn(node) => Some(&*node.body),
        Stmt::ForOf(node) => Some(&*node.body),
        _ => None,
    }
}

impl Transformer for InfiniteLoopProtectionTransformer {
    fn name(&self) -> &'static str {
        "infinite-loop-protection"
    }

    fn transform(&self, code: &str) -> Result<String, TransformError> {
        let patches = self.collect_patches(code)?;
        Ok(apply_patches(code, patches))
    }
}
