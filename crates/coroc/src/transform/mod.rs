//! Coroutine lowering.
//!
//! Rewrites every coroutine in a module into a resumable state machine:
//!
//! - the scanner validates marker placement ([`scanner`]),
//! - locals after `begin()` move into the coroutine frame ([`hoist`]),
//! - nested blocks become dispatch layers, bottom-up ([`lower`], [`layer`]),
//! - the emitter builds the top-level `switch c.state` ([`emit`]).
//!
//! The original function keeps its body behind a `HAS_GEN` guard and a
//! sibling `<name>_gen` carries the lowered body. Running the pass on its own
//! output produces the same module.

pub mod alloc;
pub mod emit;
pub mod error;
pub mod hoist;
pub mod layer;
pub mod lower;
pub mod scanner;

use std::collections::{HashMap, HashSet};

use coro_ast::{BlockStmt, FnDecl, Module};
use tracing::{debug, info};

pub use emit::HAS_GEN;
pub use error::TransformError;

#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Appended to a coroutine's name to form its generated sibling.
    pub fn_suffix: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            fn_suffix: "_gen".to_string(),
        }
    }
}

/// Names of the coroutines that were lowered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub lowered: Vec<String>,
}

/// Lower one function. Returns the guarded original and its generated
/// sibling, or `None` when the function is not a coroutine.
pub fn transform_fn(
    func: &FnDecl,
    options: &TransformOptions,
) -> Result<Option<(FnDecl, FnDecl)>, Vec<TransformError>> {
    let stmts = strip_guard(&func.body.stmts);
    let Some(scan) = scanner::scan(func, stmts)? else {
        return Ok(None);
    };
    let gen_name = format!("{}{}", func.ident.sym, options.fn_suffix);
    debug!(function = %func.ident.sym, points = scan.points, "lowering coroutine");

    let generated = emit::generated_fn(func, &gen_name, emit::emit_body(&scan, stmts.to_vec()));

    let mut original = func.clone();
    let mut body = Vec::with_capacity(stmts.len() + 1);
    body.push(emit::guard(&gen_name, &scan.handle));
    body.extend(stmts.iter().cloned());
    original.body = BlockStmt {
        stmts: body,
        span: func.body.span.clone(),
    };
    Ok(Some((original, generated)))
}

fn strip_guard(stmts: &[coro_ast::Stmt]) -> &[coro_ast::Stmt] {
    match stmts.split_first() {
        Some((first, rest)) if emit::is_guard(first) => rest,
        _ => stmts,
    }
}

/// Lower every coroutine in `module` in place and mark it generated.
///
/// Errors from all functions are collected; on error the module is left
/// unchanged.
pub fn transform_module(
    module: &mut Module,
    options: &TransformOptions,
) -> Result<TransformReport, Vec<TransformError>> {
    // Siblings from an earlier run are regenerated from their originals.
    let stale: HashSet<String> = module
        .items
        .iter()
        .filter(|f| f.body.stmts.first().is_some_and(emit::is_guard))
        .map(|f| format!("{}{}", f.ident.sym, options.fn_suffix))
        .collect();

    let mut errors = Vec::new();
    let mut lowered: HashMap<String, (FnDecl, FnDecl)> = HashMap::new();
    let mut report = TransformReport::default();
    for func in module.items.iter().filter(|f| !stale.contains(&f.ident.sym)) {
        match transform_fn(func, options) {
            Ok(Some(pair)) => {
                report.lowered.push(func.ident.sym.clone());
                lowered.insert(func.ident.sym.clone(), pair);
            }
            Ok(None) => {}
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let items = std::mem::take(&mut module.items);
    for func in items {
        if stale.contains(&func.ident.sym) {
            continue;
        }
        match lowered.remove(&func.ident.sym) {
            Some((original, generated)) => {
                module.items.push(original);
                module.items.push(generated);
            }
            None => {
                // A function that no longer holds markers drops its old guard.
                let mut func = func;
                if func.body.stmts.first().is_some_and(emit::is_guard) {
                    func.body.stmts.remove(0);
                }
                module.items.push(func);
            }
        }
    }
    module.generated = true;
    info!(coroutines = report.lowered.len(), "module lowered");
    Ok(report)
}
