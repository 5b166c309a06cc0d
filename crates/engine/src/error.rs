//! The module contains the errors the engine can throw.
//!
//! Every error is an input error: the engine is pure and only fails when the
//! values handed to it are malformed.
//!
//! - [`MissingDescription`] / [`MissingAmount`] when a required form field is empty.
//! - [`InvalidAmount`] when the amount is not a non-negative integer.
//! - [`InvalidKind`] when the kind is neither incoming nor outgoing.
//! - [`InvalidDate`] when the date is not a `YYYY-MM-DD` calendar date.
//! - [`InvalidMonth`] when a period month is outside `0..=11`.
//!
//!  [`MissingDescription`]: InputError::MissingDescription
//!  [`MissingAmount`]: InputError::MissingAmount
//!  [`InvalidAmount`]: InputError::InvalidAmount
//!  [`InvalidKind`]: InputError::InvalidKind
//!  [`InvalidDate`]: InputError::InvalidDate
//!  [`InvalidMonth`]: InputError::InvalidMonth
use thiserror::Error;

/// Engine input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("description is required")]
    MissingDescription,
    #[error("amount is required")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid month: {0} (expected 0..=11)")]
    InvalidMonth(u32),
}
