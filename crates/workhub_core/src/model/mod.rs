//! UI-shaped domain model for the portal collections.
//!
//! # Responsibility
//! - Define the entity shapes pages and stores work with.
//! - Define create drafts and partial-update patches per entity.
//! - Validate drafts and patches before they reach the record service.
//!
//! # Invariants
//! - Every entity is identified by a `RecordId` assigned by the record
//!   service; the client never generates identifiers.
//! - Identifiers are immutable once assigned, so patches carry no id.

pub mod announcement;
pub mod employee;
pub mod event;
pub mod task;

use thiserror::Error;

/// Identifier assigned by the record service, unique within one collection.
pub type RecordId = i64;

/// Validation failure raised before any remote write is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("invalid email address `{0}`")]
    InvalidEmail(String),
    #[error("event cannot end before it starts")]
    EndBeforeStart,
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn require_optional_text(
    field: &'static str,
    value: Option<&String>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => require_text(field, value),
        None => Ok(()),
    }
}
