//! Roster domain model.
//!
//! # Responsibility
//! - Define the persisted `Student`/`Address` records and their input drafts.
//! - Define the read-facing `StudentView` projection.
//!
//! # Invariants
//! - A student refers to an address by id only; it never owns it.
//! - Drafts must pass `validate()` before they reach persistence.

pub mod address;
pub mod student;
pub mod validation;
pub mod view;
