use thiserror::Error;

/// Failures raised while ticking a coroutine.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A suspension marker executed directly. Markers only exist to be
    /// rewritten by the generator; reaching one means the lowered body was
    /// not used.
    #[error(
        "`{marker}` reached at run time in coroutine `{coroutine}`; run `coroc gen` so the lowered body is used"
    )]
    MarkerInvoked {
        marker: &'static str,
        coroutine: String,
    },

    #[error("coroutine `{0}` ticked while it is already running")]
    Reentrant(String),

    #[error("coroutine `{0}` cannot delegate to itself")]
    SelfDelegation(String),

    #[error("coroutine `{coroutine}`: {source}")]
    Body {
        coroutine: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}
