//! Reading and parsing source files.

use std::path::Path;

use anyhow::{Context, Result, bail};
use coro_ast::Module;

use crate::diagnostics::{Diagnostic, emit_diagnostic};

/// A source file together with its parsed module.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub module: Module,
}

/// Parse `text`, turning a parse failure into a diagnostic for `path`.
pub fn parse_source(path: &str, text: &str) -> std::result::Result<Module, Diagnostic> {
    coro_parser::parse_module(text).map_err(|e| Diagnostic::from(&e).in_file(path))
}

/// Read and parse `path`. Parse errors are reported before returning.
pub fn load(path: &Path) -> Result<SourceFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let display = path.display().to_string();
    match parse_source(&display, &text) {
        Ok(module) => Ok(SourceFile {
            path: display,
            text,
            module,
        }),
        Err(d) => {
            emit_diagnostic(&d, Some(&text));
            bail!("could not parse {}", display)
        }
    }
}
