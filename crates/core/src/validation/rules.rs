//! Rule and outcome types — pure interfaces, no database access.

use async_trait::async_trait;
use serde_json::Value;

use super::error::{EvaluateError, StoreError};
use super::spec::RuleSpec;

/// Result of applying one rule to one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// The value did not satisfy the rule. Carries the message shown to the
    /// user: the caller-supplied custom message verbatim when present,
    /// otherwise the rule's default.
    Fail(String),
}

impl Outcome {
    /// Build a failure, preferring the custom message over the default.
    pub fn fail(custom_message: Option<&str>, default: impl Into<String>) -> Self {
        match custom_message {
            Some(message) => Self::Fail(message.to_string()),
            None => Self::Fail(default.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Everything a rule sees for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Form field name (for error reporting only; rules check the value).
    pub field: &'a str,
    /// The parsed spec that selected this rule.
    pub spec: &'a RuleSpec<'a>,
    /// Caller-supplied message that replaces the rule default on failure.
    pub custom_message: Option<&'a str>,
    /// The submitted field value.
    pub value: &'a Value,
}

impl<'a> RuleContext<'a> {
    /// Coerce the field value to text.
    ///
    /// All built-in rules operate on text; a non-string value means the spec
    /// was attached to the wrong field, which is a spec-authoring error
    /// rather than a validation failure.
    pub fn text_value(&self) -> Result<&'a str, EvaluateError> {
        self.value.as_str().ok_or_else(|| {
            EvaluateError::invalid_spec(
                self.spec.raw(),
                format!("field `{}` is not a string value", self.field),
            )
        })
    }
}

/// A named validation rule.
///
/// Implementations are registered once during startup and shared read-only
/// across request tasks, so they must be `Send + Sync` and stateless apart
/// from captured collaborators (e.g. a [`LookupStore`]).
#[async_trait]
pub trait Rule: Send + Sync {
    /// Registry key. Unique; duplicates are rejected at registration.
    fn name(&self) -> &'static str;

    /// Validate the spec's argument list without touching the value.
    ///
    /// Called before every [`apply`](Rule::apply) and by startup-time schema
    /// checks, so arity and bound mistakes surface before traffic is served.
    fn check_args(&self, _spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
        Ok(())
    }

    /// Apply the rule to one field value. At most one store query per call,
    /// no retries; store failures propagate as [`EvaluateError::Store`].
    async fn apply(&self, ctx: RuleContext<'_>) -> Result<Outcome, EvaluateError>;
}

/// Filtered-count lookups against the backing store.
///
/// The only contract the database-backed rules need:
/// `COUNT(*) FROM <table> WHERE <column> = <value> [AND id != <except_id>]`.
#[async_trait]
pub trait LookupStore: Send + Sync {
    async fn count_where(
        &self,
        table: &str,
        column: &str,
        value: &str,
        except_id: Option<&str>,
    ) -> Result<i64, StoreError>;
}
