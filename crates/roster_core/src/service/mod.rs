//! Roster use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the roster operations.
//! - Own the transaction and retry boundaries around them.

pub mod roster_store;
