//! Error types for rule evaluation.

/// Errors raised while evaluating a rule spec.
///
/// A value that merely fails a rule is NOT an error — that is
/// [`Outcome::Fail`](super::rules::Outcome). These variants indicate either a
/// mis-authored rule spec (programmer error, catch at startup via
/// [`Registry::check_schema`](super::registry::Registry::check_schema)) or an
/// unreachable lookup store.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// The spec names a rule that was never registered.
    #[error("unknown validation rule: {0}")]
    RuleNotFound(String),

    /// The spec's argument list is malformed for the selected rule.
    #[error("invalid rule spec `{spec}`: {reason}")]
    InvalidRuleSpec { spec: String, reason: String },

    /// A database-backed rule could not complete its query.
    ///
    /// Deliberately distinct from a failed lookup: "value not found" is an
    /// [`Outcome`](super::rules::Outcome), an unreachable store is this.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EvaluateError {
    /// Build an [`EvaluateError::InvalidRuleSpec`] for the given spec string.
    pub fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRuleSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

/// A lookup-store failure, kept sqlx-agnostic so core carries no database
/// dependency. The db crate converts `sqlx::Error` into this.
#[derive(Debug, thiserror::Error)]
#[error("lookup store unavailable: {0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}
