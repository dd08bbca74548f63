//! Request handlers.
//!
//! Handlers delegate to the rule registry in `reborn_core` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod validation;
