use coro_ast::Span;
use thiserror::Error;

/// Reasons a coroutine body cannot be lowered. All of them are fatal for
/// the function they name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("coroutine `{function}` calls begin() but has no suspension points")]
    BeginWithoutSuspension { function: String, span: Span },

    #[error("suspension point in `{function}` is not preceded by begin()")]
    SuspensionWithoutBegin { function: String, span: Span },

    #[error("begin() must be a top-level statement of `{function}`")]
    NestedBegin { function: String, span: Span },

    #[error("begin() appears more than once in `{function}`")]
    DuplicateBegin { function: String, span: Span },

    #[error("`{marker}` must be used as a statement, not inside an expression")]
    MarkerInExpression {
        function: String,
        marker: String,
        span: Span,
    },

    #[error("`{marker}` {expected}")]
    BadMarkerArity {
        function: String,
        marker: String,
        expected: &'static str,
        span: Span,
    },

    #[error("suspension inside a `{construct}` statement is not supported")]
    UnsupportedConstruct {
        function: String,
        construct: &'static str,
        span: Span,
    },

    #[error("coroutine `{function}` cannot return a value")]
    ValueReturn { function: String, span: Span },

    #[error("`let {handle}` shadows the coroutine handle of `{function}`")]
    ShadowedHandle {
        function: String,
        handle: String,
        span: Span,
    },

    #[error("loop in `{function}` has {count} suspension points; at most one is supported")]
    MultipleSuspensionsInLoop {
        function: String,
        count: usize,
        span: Span,
    },
}

impl TransformError {
    pub fn span(&self) -> Span {
        match self {
            TransformError::BeginWithoutSuspension { span, .. }
            | TransformError::SuspensionWithoutBegin { span, .. }
            | TransformError::NestedBegin { span, .. }
            | TransformError::DuplicateBegin { span, .. }
            | TransformError::MarkerInExpression { span, .. }
            | TransformError::BadMarkerArity { span, .. }
            | TransformError::UnsupportedConstruct { span, .. }
            | TransformError::ValueReturn { span, .. }
            | TransformError::ShadowedHandle { span, .. }
            | TransformError::MultipleSuspensionsInLoop { span, .. } => span.clone(),
        }
    }

    pub fn function(&self) -> &str {
        match self {
            TransformError::BeginWithoutSuspension { function, .. }
            | TransformError::SuspensionWithoutBegin { function, .. }
            | TransformError::NestedBegin { function, .. }
            | TransformError::DuplicateBegin { function, .. }
            | TransformError::MarkerInExpression { function, .. }
            | TransformError::BadMarkerArity { function, .. }
            | TransformError::UnsupportedConstruct { function, .. }
            | TransformError::ValueReturn { function, .. }
            | TransformError::ShadowedHandle { function, .. }
            | TransformError::MultipleSuspensionsInLoop { function, .. } => function,
        }
    }

    /// Follow-up hint shown under the diagnostic.
    pub fn note(&self) -> Option<&'static str> {
        match self {
            TransformError::BeginWithoutSuspension { .. } => {
                Some("add a yield, or remove begin() to make this an ordinary function")
            }
            TransformError::SuspensionWithoutBegin { .. } => {
                Some("call begin() as a top-level statement before the first suspension point")
            }
            TransformError::ValueReturn { .. } => {
                Some("produce output with yield(value); a bare `return;` finishes the coroutine")
            }
            TransformError::MultipleSuspensionsInLoop { .. } => {
                Some("move all but one suspension point out of the loop body")
            }
            TransformError::UnsupportedConstruct { .. } => {
                Some("rewrite the loop as `for` or `while`, or the switch as an if/else chain")
            }
            _ => None,
        }
    }
}
