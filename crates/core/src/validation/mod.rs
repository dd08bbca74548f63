//! Form-validation rule engine.
//!
//! A registry of named rules is built once at startup and shared read-only
//! across request tasks. Each rule is selected by a spec string with the
//! grammar `name[:arg[,arg]*]` and produces a pass/fail [`rules::Outcome`].
//! Two of the built-in rules consult the database through the
//! [`rules::LookupStore`] seam; the rest are pure.

pub mod builtin;
pub mod error;
pub mod form;
pub mod registry;
pub mod rules;
pub mod spec;

pub use error::{EvaluateError, StoreError};
pub use form::{FormErrors, FormSchema};
pub use registry::{Registry, RegistryBuilder};
pub use rules::{LookupStore, Outcome, Rule, RuleContext};
pub use spec::RuleSpec;
