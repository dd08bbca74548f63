//! Built-in rules.
//!
//! `exists` / `not_exists` consult the lookup store; `max_cn` / `min_cn`
//! bound field length in Unicode code points so CJK text is measured in
//! characters, not bytes. Default failure messages match the original
//! application's locale.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::EvaluateError;
use super::rules::{LookupStore, Outcome, Rule, RuleContext};
use super::spec::{check_identifier, RuleSpec};

/// `exists:<table>,<column>` — the value must match at least one row.
///
/// Typical use: a create form carries `category_id`, which must reference an
/// existing category (`exists:categories,id`).
pub struct Exists {
    store: Arc<dyn LookupStore>,
}

impl Exists {
    pub fn new(store: Arc<dyn LookupStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Rule for Exists {
    fn name(&self) -> &'static str {
        "exists"
    }

    fn check_args(&self, spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
        check_table_column(spec)
    }

    async fn apply(&self, ctx: RuleContext<'_>) -> Result<Outcome, EvaluateError> {
        let table = ctx.spec.require_arg(0, "table name")?;
        let column = ctx.spec.require_arg(1, "column name")?;
        let value = ctx.text_value()?;

        let count = self.store.count_where(table, column, value, None).await?;
        if count == 0 {
            Ok(Outcome::fail(
                ctx.custom_message,
                format!("{value} 不存在"),
            ))
        } else {
            Ok(Outcome::Pass)
        }
    }
}

/// `not_exists:<table>,<column>[,<exceptID>]` — the value must match no row.
///
/// Guards uniqueness of usernames, emails, phone numbers and the like. The
/// optional third argument excludes one row by id, for "unique except
/// myself" checks on update forms (`not_exists:users,email,32`).
pub struct NotExists {
    store: Arc<dyn LookupStore>,
}

impl NotExists {
    pub fn new(store: Arc<dyn LookupStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Rule for NotExists {
    fn name(&self) -> &'static str {
        "not_exists"
    }

    fn check_args(&self, spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
        check_table_column(spec)
    }

    async fn apply(&self, ctx: RuleContext<'_>) -> Result<Outcome, EvaluateError> {
        let table = ctx.spec.require_arg(0, "table name")?;
        let column = ctx.spec.require_arg(1, "column name")?;
        let except_id = ctx.spec.args().get(2).copied();
        let value = ctx.text_value()?;

        let count = self
            .store
            .count_where(table, column, value, except_id)
            .await?;
        if count != 0 {
            Ok(Outcome::fail(
                ctx.custom_message,
                format!("{value} 已被占用"),
            ))
        } else {
            Ok(Outcome::Pass)
        }
    }
}

/// `max_cn:<n>` — at most `n` Unicode code points.
pub struct MaxCn;

#[async_trait]
impl Rule for MaxCn {
    fn name(&self) -> &'static str {
        "max_cn"
    }

    fn check_args(&self, spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
        spec.require_usize_arg(0, "length bound").map(|_| ())
    }

    async fn apply(&self, ctx: RuleContext<'_>) -> Result<Outcome, EvaluateError> {
        let bound = ctx.spec.require_usize_arg(0, "length bound")?;
        let length = ctx.text_value()?.chars().count();
        if length > bound {
            Ok(Outcome::fail(
                ctx.custom_message,
                format!("长度不能超过 {bound} 个字"),
            ))
        } else {
            Ok(Outcome::Pass)
        }
    }
}

/// `min_cn:<n>` — at least `n` Unicode code points.
pub struct MinCn;

#[async_trait]
impl Rule for MinCn {
    fn name(&self) -> &'static str {
        "min_cn"
    }

    fn check_args(&self, spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
        spec.require_usize_arg(0, "length bound").map(|_| ())
    }

    async fn apply(&self, ctx: RuleContext<'_>) -> Result<Outcome, EvaluateError> {
        let bound = ctx.spec.require_usize_arg(0, "length bound")?;
        let length = ctx.text_value()?.chars().count();
        if length < bound {
            Ok(Outcome::fail(
                ctx.custom_message,
                format!("长度需大于 {bound} 个字"),
            ))
        } else {
            Ok(Outcome::Pass)
        }
    }
}

/// Shared arity + identifier check for the two database-backed rules.
fn check_table_column(spec: &RuleSpec<'_>) -> Result<(), EvaluateError> {
    let table = spec.require_arg(0, "table name")?;
    let column = spec.require_arg(1, "column name")?;
    check_identifier(spec.raw(), table)?;
    check_identifier(spec.raw(), column)?;
    Ok(())
}
