//! Rule spec string parsing.
//!
//! Grammar: `name[:arg[,arg]*]`. Everything before the first colon is the
//! rule name; the remainder is a comma-separated argument list. Specs are
//! parsed per invocation and never persisted.

use regex::Regex;

use super::error::EvaluateError;

/// A parsed rule spec, borrowing from the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec<'a> {
    raw: &'a str,
    name: &'a str,
    args: Vec<&'a str>,
}

impl<'a> RuleSpec<'a> {
    /// Parse a spec string such as `not_exists:users,email,7`.
    ///
    /// An empty rule name is rejected; an absent colon means zero arguments.
    pub fn parse(raw: &'a str) -> Result<Self, EvaluateError> {
        let (name, rest) = match raw.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (raw, None),
        };

        if name.is_empty() {
            return Err(EvaluateError::invalid_spec(raw, "empty rule name"));
        }

        let args = match rest {
            Some(rest) => rest.split(',').collect(),
            None => Vec::new(),
        };

        Ok(Self { raw, name, args })
    }

    /// The original spec string, for error reporting.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The rule name (text before the first colon).
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The comma-separated argument list (empty when no colon was present).
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }

    /// Fetch argument `index` or fail with [`EvaluateError::InvalidRuleSpec`].
    pub fn require_arg(&self, index: usize, what: &str) -> Result<&'a str, EvaluateError> {
        self.args
            .get(index)
            .copied()
            .ok_or_else(|| EvaluateError::invalid_spec(self.raw, format!("missing {what}")))
    }

    /// Parse argument `index` as a non-negative bound.
    ///
    /// A non-numeric bound is an error, not a silent zero.
    pub fn require_usize_arg(&self, index: usize, what: &str) -> Result<usize, EvaluateError> {
        let arg = self.require_arg(index, what)?;
        arg.parse().map_err(|_| {
            EvaluateError::invalid_spec(self.raw, format!("{what} `{arg}` is not a number"))
        })
    }
}

/// Check that `name` is usable as a SQL identifier (table or column name).
///
/// Rule specs are authored by developers, not end users, but the identifiers
/// end up interpolated into SQL text, so they are held to
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn check_identifier(spec: &str, name: &str) -> Result<(), EvaluateError> {
    let ident = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid");
    if ident.is_match(name) {
        Ok(())
    } else {
        Err(EvaluateError::invalid_spec(
            spec,
            format!("`{name}` is not a valid identifier"),
        ))
    }
}
