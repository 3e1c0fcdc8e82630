//! Parsed module representation with the source it came from
//!
//! `ParsedModule` keeps the (BOM-stripped) source alongside the AST so the
//! diagnostics layer can map spans back to lines.

use crate::{ParseError, parse_module};
use coro_ast::Module;
use std::sync::OnceLock;

/// Resource limits applied before parsing.
#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    /// Maximum source size in bytes. Override with `CORO_MAX_SOURCE_BYTES`.
    pub max_source_bytes: usize,
    /// Maximum delimiter nesting depth. Override with `CORO_MAX_NESTING`.
    pub max_nesting: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: 10 * 1024 * 1024,
            max_nesting: 128,
        }
    }
}

impl ParseLimits {
    /// Limits with environment overrides, read once per process.
    pub fn from_env() -> Self {
        static LIMITS: OnceLock<ParseLimits> = OnceLock::new();
        *LIMITS.get_or_init(|| {
            let mut limits = ParseLimits::default();
            if let Some(v) = env_usize("CORO_MAX_SOURCE_BYTES") {
                limits.max_source_bytes = v;
            }
            if let Some(v) = env_usize("CORO_MAX_NESTING") {
                limits.max_nesting = v;
            }
            limits
        })
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// A parsed module together with its source text.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub parsed: Module,
    /// Source text the spans refer to (BOM stripped).
    pub source: String,
}

/// Parse a `.coro` source string into a `ParsedModule`.
///
/// Enforces the size limit, strips a UTF-8 BOM and parses.
pub fn parse_module_with_metadata(source_code: &str) -> Result<ParsedModule, ParseError> {
    parse_with_limits(source_code, ParseLimits::from_env())
}

pub fn parse_with_limits(source_code: &str, limits: ParseLimits) -> Result<ParsedModule, ParseError> {
    if source_code.len() > limits.max_source_bytes {
        return Err(ParseError::new(
            format!(
                "source file too large: {} bytes (limit: {} bytes); set CORO_MAX_SOURCE_BYTES to increase",
                source_code.len(),
                limits.max_source_bytes
            ),
            0..0,
        ));
    }

    let source = source_code.strip_prefix('\u{FEFF}').unwrap_or(source_code);
    let parsed = crate::parse_module_limited(source, limits.max_nesting)?;
    Ok(ParsedModule {
        parsed,
        source: source.to_string(),
    })
}

impl ParsedModule {
    /// Parse with default limits, keeping the source.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let parsed = parse_module(source)?;
        Ok(Self {
            parsed,
            source: source.to_string(),
        })
    }
}
