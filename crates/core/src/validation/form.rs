//! Form schemas: per-field rule lists with optional custom messages.
//!
//! A schema is declared once per request form and drives
//! [`Registry::validate_form`](super::registry::Registry::validate_form);
//! the result is a field → messages map suitable for a 422 payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rules and custom messages for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRules {
    /// Rule spec strings, evaluated in order.
    specs: Vec<String>,
    /// Custom message per rule name, replacing the rule default on failure.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    messages: BTreeMap<String, String>,
}

impl FieldRules {
    pub fn specs(&self) -> &[String] {
        &self.specs
    }

    pub fn message_for(&self, rule_name: &str) -> Option<&str> {
        self.messages.get(rule_name).map(String::as_str)
    }
}

/// Validation schema for one form: field name → rules.
///
/// Fields are kept in declaration order so error output is stable.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldRules)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its rule spec strings.
    pub fn field(mut self, name: &str, specs: &[&str]) -> Self {
        self.fields.push((
            name.to_string(),
            FieldRules {
                specs: specs.iter().map(|s| s.to_string()).collect(),
                messages: BTreeMap::new(),
            },
        ));
        self
    }

    /// Attach a custom failure message to `(field, rule)`.
    ///
    /// The field must have been declared first.
    pub fn message(mut self, field: &str, rule: &str, message: &str) -> Self {
        let entry = self
            .fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .unwrap_or_else(|| panic!("message for undeclared field `{field}`"));
        entry.1.messages.insert(rule.to_string(), message.to_string());
        self
    }

    /// Build a schema from the wire shape used by the validate endpoint:
    /// `rules[field] = [specs]`, `messages[field][rule] = text`.
    pub fn from_parts(
        rules: BTreeMap<String, Vec<String>>,
        messages: BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        let mut messages = messages;
        Self {
            fields: rules
                .into_iter()
                .map(|(field, specs)| {
                    let messages = messages.remove(&field).unwrap_or_default();
                    (field, FieldRules { specs, messages })
                })
                .collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }
}

/// Per-field failure messages collected by a form validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::StoreError;
    use crate::validation::registry::Registry;
    use crate::validation::rules::LookupStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct FakeStore;

    #[async_trait]
    impl LookupStore for FakeStore {
        async fn count_where(
            &self,
            _table: &str,
            column: &str,
            value: &str,
            _except_id: Option<&str>,
        ) -> Result<i64, StoreError> {
            // One seeded user: email alice@example.com.
            Ok((column == "email" && value == "alice@example.com") as i64)
        }
    }

    fn registry() -> Registry {
        Registry::with_builtins(Arc::new(FakeStore))
    }

    fn signup_schema() -> FormSchema {
        FormSchema::new()
            .field("name", &["min_cn:2", "max_cn:8"])
            .field("email", &["not_exists:users,email"])
            .message("email", "not_exists", "邮箱已被占用")
    }

    #[tokio::test]
    async fn clean_submission_has_no_errors() {
        let data = json!({"name": "小明", "email": "new@example.com"});
        let errors = registry()
            .validate_form(&signup_schema(), data.as_object().unwrap())
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn failures_are_grouped_per_field() {
        let data = json!({"name": "这个名字实在是太长了", "email": "alice@example.com"});
        let errors = registry()
            .validate_form(&signup_schema(), data.as_object().unwrap())
            .await
            .unwrap();
        assert!(!errors.is_empty());
        assert_eq!(errors.field("name"), ["长度不能超过 8 个字"]);
        // Custom message from the schema, not the rule default.
        assert_eq!(errors.field("email"), ["邮箱已被占用"]);
    }

    #[tokio::test]
    async fn absent_field_validates_as_empty_string() {
        let data = json!({"email": "new@example.com"});
        let errors = registry()
            .validate_form(&signup_schema(), data.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(errors.field("name"), ["长度需大于 2 个字"]);
    }

    #[tokio::test]
    async fn multiple_failures_on_one_field_are_all_reported() {
        let schema = FormSchema::new().field("name", &["min_cn:20", "max_cn:1"]);
        let data = json!({"name": "中等长度"});
        let errors = registry()
            .validate_form(&schema, data.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(errors.field("name").len(), 2);
    }

    #[test]
    fn from_parts_keeps_messages_aligned() {
        let mut rules = BTreeMap::new();
        rules.insert("name".to_string(), vec!["min_cn:2".to_string()]);
        let mut messages = BTreeMap::new();
        messages.insert("name".to_string(), {
            let mut m = BTreeMap::new();
            m.insert("min_cn".to_string(), "too short".to_string());
            m
        });

        let schema = FormSchema::from_parts(rules, messages);
        let (_, field_rules) = schema.fields().next().unwrap();
        assert_eq!(field_rules.message_for("min_cn"), Some("too short"));
        assert_eq!(field_rules.message_for("max_cn"), None);
    }
}
