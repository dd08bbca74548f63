//! The rule registry: built once at startup, read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::builtin::{Exists, MaxCn, MinCn, NotExists};
use super::error::EvaluateError;
use super::form::{FormErrors, FormSchema};
use super::rules::{LookupStore, Outcome, Rule, RuleContext};
use super::spec::RuleSpec;

/// Accumulates rules during single-threaded startup.
pub struct RegistryBuilder {
    rules: HashMap<&'static str, Box<dyn Rule>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule under its name.
    ///
    /// Panics on a duplicate name. Registration is startup code and a
    /// silently overwritten rule would change validation behavior without a
    /// trace, so misregistration fails fast instead.
    pub fn register(mut self, rule: impl Rule + 'static) -> Self {
        let name = rule.name();
        if self.rules.insert(name, Box::new(rule)).is_some() {
            panic!("validation rule `{name}` registered twice");
        }
        self
    }

    pub fn build(self) -> Registry {
        Registry { rules: self.rules }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable mapping from rule name to implementation.
///
/// Shared as `Arc<Registry>`; safe for concurrent reads from any number of
/// request tasks. Each evaluation is independent and stateless.
pub struct Registry {
    rules: HashMap<&'static str, Box<dyn Rule>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build a registry with the four built-in rules; the database-backed
    /// ones query through `store`.
    pub fn with_builtins(store: Arc<dyn LookupStore>) -> Self {
        Self::builder()
            .register(Exists::new(Arc::clone(&store)))
            .register(NotExists::new(store))
            .register(MaxCn)
            .register(MinCn)
            .build()
    }

    /// Evaluate one rule spec against one field value.
    ///
    /// Looks up the rule named by the text before the spec's first colon,
    /// validates the argument list, then applies the rule. A failing value
    /// is `Ok(Outcome::Fail(..))`; the error cases are mis-authored specs
    /// and store outages.
    pub async fn evaluate(
        &self,
        field: &str,
        spec: &str,
        custom_message: Option<&str>,
        value: &Value,
    ) -> Result<Outcome, EvaluateError> {
        let spec = RuleSpec::parse(spec)?;
        let rule = self.get(spec.name())?;
        rule.check_args(&spec)?;
        rule.apply(RuleContext {
            field,
            spec: &spec,
            custom_message,
            value,
        })
        .await
    }

    /// Evaluate every rule of every field in `schema` against `data`,
    /// collecting per-field failure messages.
    ///
    /// Fields absent from `data` validate as the empty string, so length
    /// rules report their normal message for omitted fields.
    pub async fn validate_form(
        &self,
        schema: &FormSchema,
        data: &serde_json::Map<String, Value>,
    ) -> Result<FormErrors, EvaluateError> {
        let empty = Value::String(String::new());
        let mut errors = FormErrors::new();

        for (field, field_rules) in schema.fields() {
            let value = data.get(field).unwrap_or(&empty);
            for spec in field_rules.specs() {
                let message = field_rules.message_for(rule_name_of(spec));
                match self.evaluate(field, spec, message, value).await? {
                    Outcome::Pass => {}
                    Outcome::Fail(message) => errors.push(field, message),
                }
            }
        }

        Ok(errors)
    }

    /// Validate every rule spec a schema references, without touching data.
    ///
    /// Run at startup so `RuleNotFound` / `InvalidRuleSpec` surface before
    /// the first request instead of inside one.
    pub fn check_schema(&self, schema: &FormSchema) -> Result<(), EvaluateError> {
        for (_, field_rules) in schema.fields() {
            for raw in field_rules.specs() {
                let spec = RuleSpec::parse(raw)?;
                self.get(spec.name())?.check_args(&spec)?;
            }
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&dyn Rule, EvaluateError> {
        self.rules
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| EvaluateError::RuleNotFound(name.to_string()))
    }
}

/// Name portion of a raw spec string (text before the first colon).
fn rule_name_of(spec: &str) -> &str {
    spec.split_once(':').map_or(spec, |(name, _)| name)
}
