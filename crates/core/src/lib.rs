//! Domain logic for the reborn backend.
//!
//! Currently hosts the form-validation rule engine. Database access is
//! abstracted behind [`validation::rules::LookupStore`] so this crate stays
//! free of sqlx.

pub mod validation;
